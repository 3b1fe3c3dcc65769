use super::*;

fn buffer_commands() -> CommandRegistry {
    CommandRegistry::new()
        .register(CommandDef::new("buffer").with_alias("b"))
        .register(CommandDef::new("buffers").with_alias("ls"))
        .register(CommandDef::new("bnext").with_alias("bn"))
        .register(CommandDef::new("bdelete").with_alias("bd"))
}

#[test]
fn test_empty_registry() {
    let registry = CommandRegistry::new();
    assert!(matches!(
        registry.match_command("test"),
        MatchResult::Unknown(_)
    ));
    assert!(matches!(registry.match_command(""), MatchResult::Unknown(_)));
}

#[test]
fn test_exact_match_case_insensitive() {
    let registry = CommandRegistry::new().register(CommandDef::new("quit"));
    assert_eq!(
        registry.match_command("QUIT"),
        MatchResult::Exact("quit".to_string())
    );
    assert_eq!(
        registry.match_command(" quit "),
        MatchResult::Exact("quit".to_string())
    );
}

#[test]
fn test_exact_match_explicit_alias() {
    let registry = CommandRegistry::new().register(CommandDef::new("quit").with_alias("q"));
    assert_eq!(
        registry.match_command("q"),
        MatchResult::Exact("quit".to_string())
    );
}

#[test]
fn test_explicit_alias_overrides_prefix() {
    // "b" prefixes every command but is buffer's alias
    assert_eq!(
        buffer_commands().match_command("b"),
        MatchResult::Exact("buffer".to_string())
    );
}

#[test]
fn test_exact_name_beats_longer_names() {
    // "buffer" is also a prefix of "buffers"
    assert_eq!(
        buffer_commands().match_command("buffer"),
        MatchResult::Exact("buffer".to_string())
    );
}

#[test]
fn test_unique_prefix() {
    let registry = buffer_commands();
    assert_eq!(
        registry.match_command("bne"),
        MatchResult::Prefix("bnext".to_string())
    );
    assert_eq!(
        registry.match_command("bdel"),
        MatchResult::Prefix("bdelete".to_string())
    );
}

#[test]
fn test_prefix_of_alias() {
    let registry = CommandRegistry::new()
        .register(CommandDef::new("messages"))
        .register(CommandDef::new("buffers").with_alias("list"));
    assert_eq!(
        registry.match_command("li"),
        MatchResult::Prefix("buffers".to_string())
    );
}

#[test]
fn test_ambiguous_prefix() {
    match buffer_commands().match_command("bu") {
        MatchResult::Ambiguous { prefix, matches } => {
            assert_eq!(prefix, "bu");
            assert_eq!(matches, vec!["buffer", "buffers"]);
        }
        other => panic!("Expected ambiguous, got {other:?}"),
    }
}

#[test]
fn test_command_listed_once_when_name_and_alias_match() {
    let registry = CommandRegistry::new()
        .register(CommandDef::new("split").with_aliases(["sp", "spl"]))
        .register(CommandDef::new("set"));
    match registry.match_command("s") {
        MatchResult::Ambiguous { matches, .. } => assert_eq!(matches, vec!["split", "set"]),
        other => panic!("Expected ambiguous, got {other:?}"),
    }
}

#[test]
fn test_get_and_names() {
    let registry = buffer_commands();
    assert_eq!(registry.get("bnext").map(|c| c.aliases.clone()), Some(vec!["bn".to_string()]));
    assert!(registry.get("bn").is_none());
    assert_eq!(registry.command_names(), vec!["buffer", "buffers", "bnext", "bdelete"]);
}
