fn main() -> std::process::ExitCode {
    rider_seal::run()
}
