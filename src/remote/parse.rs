//! Parsing of `eas project:info` output.

use serde::Deserialize;

const FULL_NAME_LABEL: &str = "fullName";
const ID_LABEL: &str = "ID";

/// Remote EAS project record as reported by `eas project:info`.
///
/// Either field may be absent when the output does not mention it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RemoteProjectRecord {
    /// `<owner>/<slug>`, for example `@acme/foo`.
    pub full_name: Option<String>,
    /// Remote project id.
    pub remote_id: Option<String>,
}

impl RemoteProjectRecord {
    /// Returns the segment after the last `/` of the full name.
    ///
    /// `None` when there is no full name, it has no `/`, or the segment is
    /// empty.
    #[must_use]
    pub fn derived_slug(&self) -> Option<&str> {
        let full_name = self.full_name.as_deref()?;
        let (_, slug) = full_name.rsplit_once('/')?;
        (!slug.is_empty()).then_some(slug)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectInfoJson {
    full_name: Option<String>,
    id: Option<String>,
}

/// Parses project info output.
///
/// Output that is a JSON object is read through its `fullName` and `id`
/// keys. Anything else falls back to line scraping: a trimmed line starting
/// with `fullName` yields its last whitespace-separated token as the full
/// name, and a line starting with `ID` yields its last token as the id.
/// Later matches replace earlier ones.
#[must_use]
pub fn parse_project_info(output: &str) -> RemoteProjectRecord {
    let structured = output
        .trim_start()
        .starts_with('{')
        .then(|| serde_json::from_str::<ProjectInfoJson>(output).ok())
        .flatten();
    match structured {
        Some(info) => RemoteProjectRecord {
            full_name: info.full_name,
            remote_id: info.id,
        },
        None => scrape_lines(output),
    }
}

fn scrape_lines(output: &str) -> RemoteProjectRecord {
    let mut record = RemoteProjectRecord::default();
    for line in output.lines().map(str::trim) {
        if line.starts_with(FULL_NAME_LABEL) {
            record.full_name = last_token(line).or(record.full_name);
        } else if line.starts_with(ID_LABEL) {
            record.remote_id = last_token(line).or(record.remote_id);
        }
    }
    record
}

fn last_token(line: &str) -> Option<String> {
    line.split_whitespace().last().map(str::to_owned)
}
