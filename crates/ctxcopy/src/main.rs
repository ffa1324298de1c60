fn main() -> anyhow::Result<()> {
    ctxcopy::init();

    ctxcopy::cli::run()
}
