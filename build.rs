fn main() {
    // Validate the embedded mapping table at compile time.
    validate_toml(
        "src/table/default_mapping.toml",
        include_str!("src/table/default_mapping.toml"),
    );
}

fn validate_toml(path: &str, content: &str) {
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}
