//! Tests for project file handling.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct ProjectFixture {
    _tmp: TempDir,
    root: Utf8PathBuf,
    project: Project,
}

impl ProjectFixture {
    fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.root.join(name), contents)
            .unwrap_or_else(|err| panic!("write {name}: {err}"));
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.root.join(name))
            .unwrap_or_else(|err| panic!("read {name}: {err}"))
    }
}

#[fixture]
fn fixture() -> ProjectFixture {
    let tmp = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temp path should be utf8: {}", path.display()));
    let project = Project::new(root.clone());
    ProjectFixture {
        _tmp: tmp,
        root,
        project,
    }
}

const LINKED_APP_JSON: &str = r#"{
  "expo": {
    "name": "GTD",
    "slug": "foo",
    "owner": "me",
    "android": {
      "package": "com.example.gtd"
    },
    "extra": {
      "eas": {
        "projectId": "A"
      }
    }
  }
}
"#;

#[rstest]
fn ensure_layout_reports_first_missing_file(fixture: ProjectFixture) {
    fixture.write(PACKAGE_JSON, "{}");
    fixture.write(APP_JSON, LINKED_APP_JSON);

    let Err(ConfigError::MissingFile { path }) = fixture.project.ensure_layout() else {
        panic!("eas.json is missing");
    };
    assert_eq!(path, fixture.root.join(EAS_JSON));
}

#[rstest]
fn ensure_layout_accepts_complete_project(fixture: ProjectFixture) {
    fixture.write(PACKAGE_JSON, "{}");
    fixture.write(APP_JSON, LINKED_APP_JSON);
    fixture.write(EAS_JSON, r#"{"build": {}}"#);

    assert_eq!(fixture.project.ensure_layout(), Ok(()));
}

#[rstest]
fn load_identity_reads_slug_and_project_id(fixture: ProjectFixture) {
    fixture.write(APP_JSON, LINKED_APP_JSON);

    let identity = fixture.project.load_identity().expect("identity");

    assert_eq!(
        identity,
        ProjectIdentity {
            slug: String::from("foo"),
            remote_project_id: Some(String::from("A")),
        }
    );
}

#[rstest]
#[case(r#"{"expo": {"slug": "foo"}}"#)]
#[case(r#"{"expo": {"slug": "foo", "extra": {"eas": {"projectId": 42}}}}"#)]
#[case(r#"{"expo": {"slug": "foo", "extra": "nope"}}"#)]
fn load_identity_treats_missing_or_odd_project_id_as_unlinked(
    fixture: ProjectFixture,
    #[case] contents: &str,
) {
    fixture.write(APP_JSON, contents);

    let identity = fixture.project.load_identity().expect("identity");

    assert_eq!(identity.remote_project_id, None);
}

#[rstest]
fn load_identity_reports_missing_file(fixture: ProjectFixture) {
    let Err(ConfigError::MissingFile { path }) = fixture.project.load_identity() else {
        panic!("app.json is missing");
    };
    assert_eq!(path, fixture.root.join(APP_JSON));
}

#[rstest]
fn load_identity_reports_malformed_json(fixture: ProjectFixture) {
    fixture.write(APP_JSON, "{ not json");

    let result = fixture.project.load_identity();

    assert!(
        matches!(result, Err(ConfigError::MalformedJson { .. })),
        "unexpected result: {result:?}"
    );
}

#[rstest]
#[case(r#"{"name": "no expo"}"#, "expo")]
#[case(r#"{"expo": []}"#, "expo")]
#[case(r#"{"expo": {"name": "x"}}"#, "expo.slug")]
#[case(r#"{"expo": {"slug": 7}}"#, "expo.slug")]
#[case(r#"{"expo": {"slug": "  "}}"#, "expo.slug")]
fn load_identity_reports_missing_fields(
    fixture: ProjectFixture,
    #[case] contents: &str,
    #[case] expected_field: &str,
) {
    fixture.write(APP_JSON, contents);

    let Err(ConfigError::MissingField { field, .. }) = fixture.project.load_identity() else {
        panic!("expected missing field for {contents}");
    };
    assert_eq!(field, expected_field);
}

#[rstest]
fn summary_collects_optional_fields(fixture: ProjectFixture) {
    fixture.write(APP_JSON, LINKED_APP_JSON);

    let summary = fixture.project.summary().expect("summary");

    assert_eq!(summary.name.as_deref(), Some("GTD"));
    assert_eq!(summary.android_package.as_deref(), Some("com.example.gtd"));
    assert_eq!(summary.ios_bundle_identifier, None);
    let rendered = summary.to_string();
    assert!(rendered.starts_with("Project config:\n"), "{rendered}");
    assert!(rendered.contains("- slug: \"foo\""), "{rendered}");
    assert!(rendered.contains("- ios.bundleIdentifier: (unset)"), "{rendered}");
    assert!(rendered.contains("- extra.eas.projectId: \"A\""), "{rendered}");
}

#[rstest]
fn build_profiles_lists_build_keys(fixture: ProjectFixture) {
    fixture.write(
        EAS_JSON,
        r#"{"cli": {"version": ">= 5"}, "build": {"production": {}, "preview": {"distribution": "internal"}}}"#,
    );

    let profiles = fixture.project.build_profiles().expect("profiles");

    assert_eq!(
        profiles.into_iter().collect::<Vec<_>>(),
        vec![String::from("preview"), String::from("production")]
    );
}

#[rstest]
fn build_profiles_requires_build_object(fixture: ProjectFixture) {
    fixture.write(EAS_JSON, r#"{"build": "preview"}"#);

    let Err(ConfigError::MissingField { field, .. }) = fixture.project.build_profiles() else {
        panic!("build must be an object");
    };
    assert_eq!(field, "build");
}

#[rstest]
fn validate_profile_rejects_unknown_profile(fixture: ProjectFixture) {
    fixture.write(EAS_JSON, r#"{"build": {"preview": {}, "production": {}}}"#);

    let err = fixture
        .project
        .validate_profile("staging")
        .expect_err("staging is not declared");

    assert!(
        matches!(err, ConfigError::UnknownProfile { ref profile, .. } if profile == "staging"),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("available: preview, production"));
    assert_eq!(fixture.project.validate_profile("preview"), Ok(()));
}

#[rstest]
fn persist_clear_prunes_empty_wrappers_and_keeps_other_keys(fixture: ProjectFixture) {
    fixture.write(APP_JSON, LINKED_APP_JSON);
    let identity = fixture.project.load_identity().expect("identity");

    let changed = fixture.project.persist(&identity.unlinked()).expect("persist");

    assert!(changed);
    let expected = r#"{
  "expo": {
    "name": "GTD",
    "slug": "foo",
    "owner": "me",
    "android": {
      "package": "com.example.gtd"
    }
  }
}
"#;
    assert_eq!(fixture.read(APP_JSON), expected);
    let reloaded = fixture.project.load_identity().expect("reload");
    assert_eq!(reloaded, identity.unlinked());
}

#[rstest]
fn persist_clear_keeps_sibling_eas_fields(fixture: ProjectFixture) {
    fixture.write(
        APP_JSON,
        r#"{"expo": {"slug": "foo", "extra": {"router": {}, "eas": {"projectId": "A", "build": 1}}}}"#,
    );
    let identity = fixture.project.load_identity().expect("identity");

    fixture.project.persist(&identity.unlinked()).expect("persist");

    let expected = r#"{
  "expo": {
    "slug": "foo",
    "extra": {
      "router": {},
      "eas": {
        "build": 1
      }
    }
  }
}
"#;
    assert_eq!(fixture.read(APP_JSON), expected);
}

#[rstest]
fn persist_clear_keeps_unrelated_numbers_verbatim(fixture: ProjectFixture) {
    fixture.write(
        APP_JSON,
        r#"{"expo":{"slug":"foo","big":100000000000000000000,"ver":1.10,"extra":{"eas":{"projectId":"A"}}}}"#,
    );
    let identity = fixture.project.load_identity().expect("identity");

    fixture.project.persist(&identity.unlinked()).expect("persist");

    let expected = r#"{
  "expo": {
    "slug": "foo",
    "big": 100000000000000000000,
    "ver": 1.10
  }
}
"#;
    assert_eq!(fixture.read(APP_JSON), expected);
}

#[rstest]
fn persist_without_change_leaves_file_untouched(fixture: ProjectFixture) {
    let original = r#"{"expo":{"slug":"foo"}}"#;
    fixture.write(APP_JSON, original);
    let identity = fixture.project.load_identity().expect("identity");

    let changed = fixture.project.persist(&identity).expect("persist");

    assert!(!changed);
    assert_eq!(fixture.read(APP_JSON), original);
}

#[rstest]
fn persist_sets_project_id_creating_wrappers(fixture: ProjectFixture) {
    fixture.write(APP_JSON, r#"{"expo":{"slug":"foo"},"other":true}"#);

    let changed = fixture
        .project
        .persist(&ProjectIdentity {
            slug: String::from("foo"),
            remote_project_id: Some(String::from("B")),
        })
        .expect("persist");

    assert!(changed);
    let reloaded = fixture.project.load_identity().expect("reload");
    assert_eq!(reloaded.remote_project_id.as_deref(), Some("B"));
    assert!(fixture.read(APP_JSON).ends_with("\"other\": true\n}\n"));
}

#[rstest]
fn persist_rejects_non_object_extra(fixture: ProjectFixture) {
    fixture.write(APP_JSON, r#"{"expo":{"slug":"foo","extra":[]}}"#);

    let result = fixture.project.persist(&ProjectIdentity {
        slug: String::from("foo"),
        remote_project_id: Some(String::from("B")),
    });

    assert!(
        matches!(result, Err(ConfigError::InvalidStructure { .. })),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn has_dir_and_has_file_distinguish_kinds(fixture: ProjectFixture) {
    std::fs::create_dir(fixture.root.join("node_modules")).expect("mkdir");
    fixture.write(PACKAGE_JSON, "{}");

    assert!(fixture.project.has_dir("node_modules"));
    assert!(!fixture.project.has_file("node_modules"));
    assert!(fixture.project.has_file(PACKAGE_JSON));
    assert!(!fixture.project.has_dir("package-lock.json"));
}
