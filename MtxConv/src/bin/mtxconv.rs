fn main() -> anyhow::Result<()> {
    mtxconv::cli::run_cli()
}
