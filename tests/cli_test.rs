use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use stencil::cli::{parse_key_value, Args, Command};
use stencil::config::{ApplyConfig, RenderConfig};
use stencil::error::Error;
use stencil::fileset::FileSet;
use stencil::processor::Transformation;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("stencil")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_render_args() {
    let args = make_args(&["render", "-t", "header.j2", "-o", "target/header.txt"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(!parsed.verbose);
    assert!(parsed.config.is_none());
    match parsed.command {
        Command::Render(render) => {
            assert_eq!(render.template.as_deref(), Some("header.j2"));
            assert_eq!(render.output, Some(PathBuf::from("target/header.txt")));
            assert!(render.transformations.is_empty());
        }
        _ => panic!("Expected render command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = make_args(&["apply", "-t", "page.j2", "-d", "docs", "-v", "-e", "latin1", "-D", "a=b"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    assert_eq!(parsed.encoding.as_deref(), Some("latin1"));
    assert_eq!(parsed.defines, vec![("a".to_string(), "b".to_string())]);
}

#[test]
fn test_apply_args() {
    let args = make_args(&[
        "apply",
        "--template",
        "page.j2",
        "--template-dir",
        "templates",
        "--dir",
        "docs",
        "--output-dir",
        "target/docs",
        "-i",
        "**/*.md",
        "-i",
        "*.txt",
        "-x",
        "drafts/",
        "-P",
        "title=Guide",
        "--no-default-excludes",
        "--follow-symlinks",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    let Command::Apply(apply) = parsed.command else {
        panic!("Expected apply command");
    };
    assert_eq!(apply.includes, vec!["**/*.md", "*.txt"]);
    assert_eq!(apply.excludes, vec!["drafts/"]);
    assert_eq!(apply.properties, vec![("title".to_string(), "Guide".to_string())]);
    assert!(apply.no_default_excludes);
    assert!(apply.follow_symlinks);

    let request = apply.request(&ApplyConfig::default()).unwrap();
    assert_eq!(request.template_name, "page.j2");
    assert_eq!(request.template_directory, Some(PathBuf::from("templates")));
    assert_eq!(request.file_set.directory, PathBuf::from("docs"));
    assert_eq!(request.file_set.output_directory, Some(PathBuf::from("target/docs")));
    assert!(!request.file_set.use_default_excludes);
    assert!(request.file_set.follow_symlinks);
    assert_eq!(request.properties.get("title").map(String::as_str), Some("Guide"));
}

#[test]
fn test_missing_subcommand() {
    let args = make_args(&["--verbose"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_invalid_define() {
    let args = make_args(&["render", "-D", "novalue"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_parse_key_value() {
    assert_eq!(parse_key_value("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
    assert_eq!(parse_key_value("empty=").unwrap(), ("empty".to_string(), String::new()));
    assert!(parse_key_value("=value").is_err());
    assert!(parse_key_value("plain").is_err());
}

#[test]
fn test_render_arguments_override_config() {
    let config = RenderConfig {
        template: Some("configured.j2".to_string()),
        output_file: Some(PathBuf::from("configured.txt")),
        transformations: vec![Transformation::new("a.j2", "a.txt")],
    };
    let args = make_args(&["render", "-t", "cli.j2", "--transformation", "b.j2=b.txt"]);
    let Command::Render(render) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected render command");
    };

    let primary = render.primary(&config).unwrap();
    assert_eq!(primary, Some(Transformation::new("cli.j2", "configured.txt")));

    let transformations = render.transformations(&config);
    assert_eq!(
        transformations,
        vec![Transformation::new("a.j2", "a.txt"), Transformation::new("b.j2", "b.txt")]
    );
}

#[test]
fn test_render_template_without_output_is_rejected() {
    let args = make_args(&["render", "-t", "cli.j2"]);
    let Command::Render(render) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected render command");
    };

    assert!(matches!(render.primary(&RenderConfig::default()), Err(Error::ConfigError(_))));

    let args = make_args(&["render", "-o", "out.txt"]);
    let Command::Render(render) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected render command");
    };
    assert!(matches!(render.primary(&RenderConfig::default()), Err(Error::ConfigError(_))));

    let args = make_args(&["render"]);
    let Command::Render(render) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected render command");
    };
    assert!(render.primary(&RenderConfig::default()).unwrap().is_none());
}

#[test]
fn test_apply_arguments_override_config() {
    let mut config = ApplyConfig {
        template_name: Some("page.j2".to_string()),
        file_set: Some(FileSet::new("docs").include("**/*.md").exclude("drafts/")),
        ..ApplyConfig::default()
    };
    config.properties.insert("title".to_string(), "Configured".to_string());
    config.properties.insert("author".to_string(), "Team".to_string());

    let args = make_args(&["apply", "-d", "site", "-i", "*.txt", "-P", "title=Cli"]);
    let Command::Apply(apply) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected apply command");
    };
    let request = apply.request(&config).unwrap();

    assert_eq!(request.template_name, "page.j2");
    assert_eq!(request.file_set.directory, PathBuf::from("site"));
    assert_eq!(request.file_set.includes, vec!["*.txt"]);
    assert_eq!(request.file_set.excludes, vec!["drafts/"]);
    assert_eq!(request.properties.get("title").map(String::as_str), Some("Cli"));
    assert_eq!(request.properties.get("author").map(String::as_str), Some("Team"));
}

#[test]
fn test_apply_requires_template_and_directory() {
    let args = make_args(&["apply", "-d", "docs"]);
    let Command::Apply(apply) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected apply command");
    };
    assert!(matches!(apply.request(&ApplyConfig::default()), Err(Error::ConfigError(_))));

    let args = make_args(&["apply", "-t", "page.j2"]);
    let Command::Apply(apply) = Args::try_parse_from(args).unwrap().command else {
        panic!("Expected apply command");
    };
    assert!(matches!(apply.request(&ApplyConfig::default()), Err(Error::ConfigError(_))));
}
