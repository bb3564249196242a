fn main() -> anyhow::Result<()> {
    triplestore_cli::run()
}
