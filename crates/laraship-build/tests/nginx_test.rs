use laraship_build::nginx::rewrite_document_root;
use proptest::prelude::*;

#[test]
fn rewrites_default_document_root() {
    let conf = "server {\n    root /var/www/html;\n    index index.php;\n}\n";

    let patched = rewrite_document_root(conf, "/var/www/html").unwrap().unwrap();

    assert_eq!(
        patched,
        "server {\n    root /var/www/html/public;\n    index index.php;\n}\n"
    );
}

#[test]
fn tolerates_any_whitespace_between_directive_and_path() {
    let patched = rewrite_document_root("root\t  /var/www/html;", "/var/www/html")
        .unwrap()
        .unwrap();

    assert_eq!(patched, "root /var/www/html/public;");
}

#[test]
fn only_first_directive_is_rewritten() {
    let conf = "root /var/www/html;\nroot /var/www/html;\n";

    let patched = rewrite_document_root(conf, "/var/www/html").unwrap().unwrap();

    assert_eq!(patched, "root /var/www/html/public;\nroot /var/www/html;\n");
}

#[test]
fn already_public_root_is_not_a_match() {
    let conf = "root /var/www/html/public;\n";

    assert_eq!(rewrite_document_root(conf, "/var/www/html").unwrap(), None);
}

#[test]
fn other_root_is_not_a_match() {
    let conf = "root /usr/share/nginx/html;\n";

    assert_eq!(rewrite_document_root(conf, "/var/www/html").unwrap(), None);
}

#[test]
fn path_is_matched_literally() {
    let conf = "root /var/www/htmlx;\nroot /var/wwwXhtml;\n";

    assert_eq!(rewrite_document_root(conf, "/var/www/html").unwrap(), None);
}

proptest! {
    #[test]
    fn rewrite_always_points_at_public(
        prefix in "[a-z \n{};]{0,40}",
        suffix in "[a-z \n{};]{0,40}",
    ) {
        let conf = format!("{prefix}\nroot /var/www/html;\n{suffix}");

        let patched = rewrite_document_root(&conf, "/var/www/html").unwrap().unwrap();

        prop_assert!(patched.contains("root /var/www/html/public;"));
        prop_assert!(!patched.contains("root /var/www/html;"));
        prop_assert_eq!(patched.len(), conf.len() + "/public".len());
    }

    #[test]
    fn config_without_directive_is_not_rewritten(conf in "[a-z \n{};/]{0,80}") {
        prop_assume!(!conf.contains("/var/www/html"));

        prop_assert_eq!(rewrite_document_root(&conf, "/var/www/html").unwrap(), None);
    }
}
