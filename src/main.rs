fn main() -> std::process::ExitCode {
    outreach_merge_lib::run()
}
