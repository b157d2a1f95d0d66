fn main() {
    spe_cli::cli::run();
}
