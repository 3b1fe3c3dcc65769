/// `(filetype, filename pattern, content pattern)`
pub(super) const DEFAULT_FILETYPES: &[(&str, &str, Option<&str>)] = &[
    ("ini", r".*(\.git(config|modules)|git/config)", None),
    (
        "cpp",
        r".*\.(cc|cpp|cxx|C|h|hh|hpp|hxx|H)$",
        Some(r"\btemplate\s*<|\bclass\s+\w+|\b(typename|namespace)\b|\b(public|private|protected)\s*:"),
    ),
    ("c", r".*\.(c|h)$", None),
    ("go", r".*\.go$", None),
    ("zig", r".*[.](zig|zon)$", None),
    ("java", r".*\.java$", None),
    ("javascript", r".*[.][cm]?(js)x?$", None),
    (
        "typescript",
        r".*[.][cm]?(ts)x?$",
        Some(r#"(?m)^\s*(import.+from\s+['"]react|///\s*<reference\s)"#),
    ),
    ("sh", r".*\.((z|ba|c|k|mk)?(sh(rc|_profile|env)?|profile))$", None),
    ("html", r".*\.html?$", None),
    ("css", r".*[.](css)$", None),
    ("scss", r".*[.](scss)$", None),
    ("python", r".*[.](pyi?)$", None),
    ("toml", r".*\.(toml)$", None),
    ("haskell", r".*[.](hs)$", None),
    ("lua", r".*[.](lua|rockspec)$", None),
    ("yaml", r".*[.](ya?ml)$", None),
    ("json", r".*[.](json)$", None),
    ("markdown", r".*[.](markdown|md|mkd)$", None),
    (
        "rust",
        r".*[.](rust|rs)$",
        Some(r"(?m)^(use |fn |mod |pub |macro_rules|impl|#!?\[)"),
    ),
    (
        "r",
        r"(.*/)?(\.Rprofile|.*\.[rR])",
        Some(r"(?m)^\s*(library\(|\w+\s*<-)"),
    ),
    ("dockerfile", r".*/?Dockerfile(\..+)?$", None),
    ("makefile", r"(.*/)?(GNU)?[Mm]akefile$", None),
    ("latex", r".*\.(tex|cls|sty|dtx)$", None),
    ("fish", r".*[.](fish)$", None),
    ("sql", r".*[.](sql)$", None),
];
