fn main() -> miette::Result<()> {
    sassafras::cli::run()
}
