//! Common constants used throughout the Stencil application.

/// Supported configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["stencil.yaml", "stencil.yml", "stencil.json"];

/// Project property consulted when no encoding is configured
pub const SOURCE_ENCODING_PROPERTY: &str = "project.build.sourceEncoding";

/// Relative path between two identical directories
pub const CURRENT_DIR: &str = ".";

/// Name under which top-level templates are evaluated
pub const EVALUATION_NAME: &str = "stencil";

/// Patterns excluded from every file set unless default excludes are disabled
pub const DEFAULT_EXCLUDES: [&str; 26] = [
    // Miscellaneous typical temporary files
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    // CVS
    "**/CVS",
    "**/CVS/**",
    "**/.cvsignore",
    // RCS and SCCS
    "**/RCS",
    "**/RCS/**",
    "**/SCCS",
    "**/SCCS/**",
    // Subversion
    "**/.svn",
    "**/.svn/**",
    // Git
    "**/.git",
    "**/.git/**",
    "**/.gitattributes",
    "**/.gitignore",
    "**/.gitmodules",
    // Mercurial
    "**/.hg",
    "**/.hg/**",
    "**/.hgignore",
    // Bazaar
    "**/.bzr",
    "**/.bzr/**",
    "**/.bzrignore",
    // Mac
    "**/.DS_Store",
];
