//! sledger-check - Validate a ledger file.

fn main() -> std::process::ExitCode {
    splitledger::cmd::check::main()
}
