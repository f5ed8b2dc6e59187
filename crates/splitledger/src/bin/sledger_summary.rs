//! sledger-summary - Show one user's standing across all of their groups.

fn main() -> std::process::ExitCode {
    splitledger::cmd::summary::main()
}
