fn main() -> anyhow::Result<()> {
    colorshare::cli::run_cli()
}
