// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    source: SourceLimits,
    lexical: LexicalLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct SourceLimits {
    max_source_size: u64,
    large_source_threshold: u64,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_define_count: usize,
    max_keyword_count: usize,
    max_type_list_candidates: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CBOT_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=CBOT_CONFIG_DIR");

    let profile = env::var("CBOT_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("CBOT_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the cbot_lexer directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_SOURCE_SIZE: u64 = 1_000_000_000;
    // Keyword ranges are 100 ids wide and there are four of them
    const ABSOLUTE_MAX_KEYWORDS: usize = 400;

    if config.source.max_source_size > ABSOLUTE_MAX_SOURCE_SIZE {
        panic!("SECURITY: max_source_size exceeds absolute maximum");
    }

    if config.source.large_source_threshold > config.source.max_source_size {
        panic!("large_source_threshold must not exceed max_source_size");
    }

    if config.lexical.max_keyword_count == 0
        || config.lexical.max_keyword_count > ABSOLUTE_MAX_KEYWORDS
    {
        panic!("max_keyword_count must be between 1 and {}", ABSOLUTE_MAX_KEYWORDS);
    }

    if config.lexical.max_define_count == 0 {
        panic!("max_define_count must be at least 1");
    }

    if config.lexical.max_type_list_candidates == 0 {
        panic!("max_type_list_candidates must be at least 1");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.source.max_source_size > 50_000_000 {
        panic!("PRODUCTION: max_source_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod source {{
        pub const MAX_SOURCE_SIZE: u64 = {};
        pub const LARGE_SOURCE_THRESHOLD: u64 = {};
    }}

    pub mod lexical {{
        pub const MAX_DEFINE_COUNT: usize = {};
        pub const MAX_KEYWORD_COUNT: usize = {};
        pub const MAX_TYPE_LIST_CANDIDATES: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Source
        config.source.max_source_size,
        config.source.large_source_threshold,
        // Lexical
        config.lexical.max_define_count,
        config.lexical.max_keyword_count,
        config.lexical.max_type_list_candidates,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
