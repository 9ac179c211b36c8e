use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use fv_backend::InstalledEntry;

const HEADER: [&str; 7] = [
    "Directory",
    "Tag",
    "Version",
    "Channel",
    "Active",
    "Project",
    "Mismatch",
];

pub fn render_installed(entries: &[InstalledEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(HEADER);

    for entry in entries {
        table.add_row(vec![
            entry.directory.clone(),
            entry.tag.clone(),
            entry.resolved.version.clone(),
            entry.resolved.channel.to_string(),
            yes_no(entry.is_active).to_string(),
            yes_no(entry.is_project_pinned).to_string(),
            entry.mismatch.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use fv_backend::{Channel, VersionInfo};

    use super::*;

    fn entry(tag: &str, info: VersionInfo, mismatch: Option<&str>) -> InstalledEntry {
        InstalledEntry {
            directory: format!("flutter-{tag}"),
            tag: tag.to_string(),
            resolved: info,
            is_active: tag == "stable",
            is_project_pinned: false,
            mismatch: mismatch.map(str::to_string),
        }
    }

    #[test]
    fn one_line_per_entry_with_all_columns() {
        let entries = [
            entry("3.13.9", VersionInfo::new("3.13.9", Channel::Stable), None),
            entry(
                "beta",
                VersionInfo::new("3.16.2", Channel::Stable),
                Some("Directory doesn't match channel stable"),
            ),
            entry("stable", VersionInfo::new("3.16.2", Channel::Stable), None),
        ];

        let rendered = render_installed(&entries).to_string();

        for column in HEADER {
            assert!(rendered.contains(column), "missing column {column}");
        }
        let beta_line = rendered
            .lines()
            .find(|line| line.contains("flutter-beta"))
            .expect("beta row");
        assert!(beta_line.contains("Directory doesn't match channel stable"));
        let stable_line = rendered
            .lines()
            .find(|line| line.contains("flutter-stable"))
            .expect("stable row");
        assert!(stable_line.contains("yes"));
    }

    #[test]
    fn empty_listing_still_has_header() {
        let rendered = render_installed(&[]).to_string();

        assert!(rendered.contains("Directory"));
        assert!(!rendered.contains("flutter-"));
    }
}
