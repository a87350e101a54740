// integration tests for man page generation

use clap::CommandFactory;
use clap_mangen::Man;
use scriptcond::cli::Cli;

/// render the man page the same way the generate-man binary does
fn render_man_page() -> String {
    let mut buffer = Vec::new();
    Man::new(Cli::command())
        .render(&mut buffer)
        .expect("Failed to render man page");
    String::from_utf8(buffer).expect("man page is not UTF-8")
}

#[test]
fn test_man_page_has_name_section() {
    let content = render_man_page();
    assert!(content.contains(".SH NAME"));
    assert!(content.contains("scriptcond"));
}

#[test]
fn test_man_page_lists_subcommands() {
    let content = render_man_page();
    for command in ["dump", "qualify", "types", "config", "completions"] {
        assert!(
            content.contains(command),
            "man page should mention '{}'",
            command
        );
    }
}

#[test]
fn test_man_page_documents_global_options() {
    let content = render_man_page();
    assert!(content.contains("config"));
    assert!(content.contains("json"));
    assert!(content.contains("quiet"));
}
