//! sledger-balances - Show who owes whom inside one group.

fn main() -> std::process::ExitCode {
    splitledger::cmd::balances::main()
}
