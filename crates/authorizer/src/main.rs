fn main() -> anyhow::Result<()> {
    authorizer::run(std::env::args())
}
