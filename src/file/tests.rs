// Author: Dustin Pilgrim
// License: GPL-3.0-or-later

#[cfg(test)]
use super::*;

const MANIFEST: &str = r#"
"AppState"
{
	"appid"		"440"
	"Universe"		"1"
	"name"		"Team Fortress 2"
	"StateFlags"		"4"
	"installdir"		"Team Fortress 2"
	"SizeOnDisk"		"31024719823"
	"AutoUpdateBehavior"		"0"
	"UserConfig"
	{
		"language"		"english"
	}
	"InstalledDepots"
	{
		"441"
		{
			"manifest"		"7707612755534279158"
			"size"		"30939497587"
		}
		"232251"
		{
			"manifest"		"1609396208357036787"
			"size"		"85221916"
		}
	}
	"platform"		"linux"
	"platform"		"windows"
}
"#;

#[test]
fn test_typed_access() {
    let file = VdfFile::from_str(MANIFEST).expect("Failed to parse manifest");

    let appid: u32 = file.get("AppState.appid").expect("Failed to get appid");
    assert_eq!(appid, 440);

    let name: String = file.get("AppState.name").unwrap();
    assert_eq!(name, "Team Fortress 2");

    let size: u64 = file.get("AppState.SizeOnDisk").unwrap();
    assert_eq!(size, 31_024_719_823);

    let auto_update: bool = file.get("AppState.AutoUpdateBehavior").unwrap();
    assert!(!auto_update);

    let language: String = file.get("AppState.UserConfig.language").unwrap();
    assert_eq!(language, "english");
}

#[test]
fn test_case_insensitive_fallback() {
    let file = VdfFile::from_str(MANIFEST).unwrap();
    let appid: u32 = file.get("appstate.AppID").unwrap();
    assert_eq!(appid, 440);
    assert!(file.has("APPSTATE.userconfig.LANGUAGE"));
}

#[test]
fn test_missing_path_is_not_found() {
    let file = VdfFile::from_str(MANIFEST).unwrap();

    let err = file.get::<String>("AppState.missing").unwrap_err();
    assert!(err.is_not_found());
    assert!(!file.has("AppState.missing"));
    assert!(!file.has("Nope.appid"));

    assert_eq!(file.get_optional::<String>("AppState.missing").unwrap(), None);
    assert_eq!(file.get_optional::<String>("AppState.platform").unwrap(), Some("linux".into()));
    assert_eq!(file.get_or("AppState.BytesToDownload", 0u64), 0);
}

#[test]
fn test_type_error_carries_line() {
    let file = VdfFile::from_str(MANIFEST).unwrap();

    match file.get::<u32>("AppState.name").unwrap_err() {
        VdfError::TypeError { line, message, .. } => {
            assert_eq!(line, 6);
            assert!(message.contains("Team Fortress 2"));
        }
        other => panic!("Expected TypeError, got {:?}", other),
    }

    // a block where a scalar is expected
    assert!(matches!(
        file.get::<String>("AppState.UserConfig").unwrap_err(),
        VdfError::TypeError { .. }
    ));
}

#[test]
fn test_path_through_scalar() {
    let file = VdfFile::from_str(MANIFEST).unwrap();
    let err = file.get::<String>("AppState.name.inner").unwrap_err();
    assert_eq!(err.code(), Some(307));
    assert!(!file.has("AppState.name.inner"));
}

#[test]
fn test_get_all_and_keys_keep_order_and_duplicates() {
    let file = VdfFile::from_str(MANIFEST).unwrap();

    let platforms: Vec<String> = file.get_all("AppState.platform").unwrap();
    assert_eq!(platforms, vec!["linux", "windows"]);

    let none: Vec<String> = file.get_all("AppState.nothing").unwrap();
    assert!(none.is_empty());

    let depots = file.get_keys("AppState.InstalledDepots").unwrap();
    assert_eq!(depots, vec!["441", "232251"]);

    let keys = file.get_keys("AppState").unwrap();
    assert_eq!(keys.iter().filter(|k| *k == "platform").count(), 2);

    assert_eq!(file.get_keys("").unwrap(), vec!["AppState"]);
    assert!(file.get_keys("AppState.name").is_err());
}

#[test]
fn test_block_and_vec_conversions() {
    let file = VdfFile::from_str(MANIFEST).unwrap();

    let depot: Block = file.get("AppState.InstalledDepots.441").unwrap();
    assert_eq!(depot.get_str("size").unwrap(), "30939497587");

    let config: Vec<String> = file.get("AppState.UserConfig").unwrap();
    assert_eq!(config, vec!["english"]);

    let sizes: Vec<Block> = file.get("AppState.InstalledDepots").unwrap();
    assert_eq!(sizes.len(), 2);
}

#[test]
fn test_lookup_keys_with_dots() {
    let file = VdfFile::from_str(r#""versions" { "1.0" "old" "2.0" "new" }"#).unwrap();
    assert_eq!(file.lookup(&["versions", "2.0"]).unwrap().as_str(), Some("new"));
    assert!(!file.has("versions.2.0"));
}

#[test]
fn test_set_append_remove() {
    let mut file = VdfFile::from_str(MANIFEST).unwrap();

    file.set("AppState.UserConfig.language", "german").unwrap();
    assert_eq!(file.get::<String>("AppState.UserConfig.language").unwrap(), "german");

    // set only touches the first duplicate
    file.set("AppState.platform", "macos").unwrap();
    let platforms: Vec<String> = file.get_all("AppState.platform").unwrap();
    assert_eq!(platforms, vec!["macos", "windows"]);

    file.set("AppState.MountedConfig.BetaKey", "prerelease").unwrap();
    assert_eq!(file.get::<String>("AppState.MountedConfig.BetaKey").unwrap(), "prerelease");

    file.append("AppState.platform", "linux").unwrap();
    let removed = file.remove("AppState.platform", RemoveMode::All).unwrap();
    assert_eq!(removed.len(), 3);
    assert!(!file.has("AppState.platform"));

    let removed = file.remove("AppState.platform", RemoveMode::First).unwrap();
    assert!(removed.is_empty());

    assert!(file.remove("Missing.key", RemoveMode::First).unwrap_err().is_not_found());
    assert!(file.set("AppState.name.inner", "x").is_err());
}

#[test]
fn test_error_lines_follow_edits() {
    let mut file = VdfFile::from_str("// header\n// header\n\"a\" \"x\"\n").unwrap();
    let line_of = |file: &VdfFile, path: &str| match file.get::<u32>(path).unwrap_err() {
        VdfError::TypeError { line, .. } => line,
        other => panic!("Expected TypeError, got {:?}", other),
    };
    assert_eq!(line_of(&file, "a"), 3);

    file.set("b", "y").unwrap();
    assert_eq!(line_of(&file, "a"), 1);
    assert_eq!(line_of(&file, "b"), 2);

    file.append("c", "z").unwrap();
    file.remove("a", RemoveMode::All).unwrap();
    assert_eq!(line_of(&file, "c"), 2);

    let err = file.get_string_enum("c", &["q"]).unwrap_err();
    assert!(matches!(err, VdfError::TypeError { line: 2, .. }));
}

#[test]
fn test_remove_first_keeps_order() {
    let mut file = VdfFile::from_str(r#""a" "1" "b" "2" "a" "3" "c" "4""#).unwrap();
    let removed = file.remove("a", RemoveMode::First).unwrap();
    assert_eq!(removed, vec![Node::Scalar("1".into())]);
    assert_eq!(file.get_keys("").unwrap(), vec!["b", "a", "c"]);
}

#[test]
fn test_string_enum_validation() {
    let file = VdfFile::from_str(MANIFEST).unwrap();

    let platform = file.get_string_enum("AppState.platform", &["Linux", "Windows", "MacOS"]);
    assert_eq!(platform.unwrap(), "linux");

    let err = file.get_string_enum("AppState.installdir", &["a", "b"]).unwrap_err();
    assert_eq!(err.code(), Some(451));

    let flags = file.get_validated("AppState.StateFlags", |f: &u32| *f & 4 != 0, "a fully installed state");
    assert_eq!(flags.unwrap(), 4);

    let universe = file.get_validated("AppState.Universe", |u: &u8| *u == 0, "0");
    assert_eq!(universe.unwrap_err().code(), Some(450));
}

#[test]
fn test_number_conversions() {
    assert_eq!(i32::try_from(Node::from("-12")).unwrap(), -12);
    assert_eq!(f32::try_from(Node::from(" 0.5 ")).unwrap(), 0.5);
    assert!(u8::try_from(Node::from("256")).is_err());
    assert!(u16::try_from(Node::from("-1")).is_err());
    assert!(i64::try_from(Node::Block(Block::new())).is_err());
    assert!(bool::try_from(Node::from("TRUE")).unwrap());
    assert!(bool::try_from(Node::from("yes")).is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appmanifest_440.acf");
    std::fs::write(&path, MANIFEST).unwrap();

    let mut file = VdfFile::from_file(&path).expect("Failed to load manifest");
    assert_eq!(file.path(), Some(path.as_path()));

    file.set("AppState.StateFlags", "1026").unwrap();
    file.save().expect("Failed to save");

    let reloaded = VdfFile::from_file(&path).unwrap();
    assert_eq!(reloaded.get::<u32>("AppState.StateFlags").unwrap(), 1026);
    assert_eq!(reloaded.document(), file.document());
}

#[test]
fn test_save_without_origin_fails() {
    let mut file = VdfFile::new();
    file.set("a", "b").unwrap();
    assert!(matches!(file.save().unwrap_err(), VdfError::Io(_)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.vdf");
    file.save_as(&path).unwrap();
    assert_eq!(file.path(), Some(path.as_path()));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a\"\t\t\"b\"\n");
}

#[test]
fn test_fallback_only_on_missing_primary() {
    let dir = tempfile::tempdir().unwrap();
    let primary = dir.path().join("primary.vdf");
    let fallback = dir.path().join("fallback.vdf");
    std::fs::write(&fallback, "\"source\" \"fallback\"").unwrap();

    let file = VdfFile::from_file_with_fallback(&primary, &fallback).unwrap();
    assert_eq!(file.get::<String>("source").unwrap(), "fallback");

    std::fs::write(&primary, "\"source\" {").unwrap();
    let err = VdfFile::from_file_with_fallback(&primary, &fallback).unwrap_err();
    assert!(matches!(err, VdfError::SyntaxError { .. }));
}

#[test]
fn test_custom_write_options_in_display() {
    let file = VdfFile::from_str("\"a\" { \"b\" \"c\" }")
        .unwrap()
        .with_write_options(WriteOptions::default().indent("  ").separator(" "));
    assert_eq!(file.to_string(), "\"a\"\n{\n  \"b\" \"c\"\n}\n");
}
