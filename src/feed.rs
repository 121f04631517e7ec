use tracing::{debug, warn};

use crate::asset::select_asset;
use crate::date::format_rfc822_date;
use crate::error::{AppcastError, Result};
use crate::markdown::markdown_to_html;
use crate::types::{Enclosure, FeedEntry, Release};

const CHANNEL_TITLE: &str = "XKey Updates";
const CHANNEL_DESCRIPTION: &str = "XKey - Vietnamese Input Method for macOS";
const CHANNEL_LANGUAGE: &str = "vi";
const MINIMUM_SYSTEM_VERSION: &str = "12.0";
const FULL_NOTES_LABEL: &str = "Xem chi tiết trên GitHub";

/// Strips a single leading `v` from a release tag.
pub fn version_from_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Builds the feed entry for one release.
///
/// Returns `Ok(None)` when the release cannot be offered (no installer, or a
/// tag that is only the `v` marker). Timestamp problems are errors.
pub fn build_entry(release: &Release) -> Result<Option<FeedEntry>> {
    let Some(asset) = select_asset(&release.assets) else {
        warn!(tag = %release.tag_name, "No DMG found for release");
        return Ok(None);
    };

    let version = version_from_tag(&release.tag_name);
    if version.is_empty() {
        warn!(tag = %release.tag_name, "Release tag has no version");
        return Ok(None);
    }

    let mut notes_html = release
        .body
        .as_deref()
        .filter(|body| !body.is_empty())
        .map(markdown_to_html)
        .unwrap_or_default();
    if !notes_html.is_empty() {
        notes_html.push_str(&format!(
            "\n<p><a href=\"{}\">{}</a></p>",
            release.html_url, FULL_NOTES_LABEL
        ));
    }

    let timestamp = release
        .published_at
        .as_deref()
        .or(release.created_at.as_deref())
        .ok_or_else(|| AppcastError::MissingTimestamp(release.tag_name.clone()))?;
    let pub_date = format_rfc822_date(timestamp)?;

    Ok(Some(FeedEntry {
        version: version.to_string(),
        release_url: release.html_url.clone(),
        notes_html,
        pub_date,
        minimum_system_version: MINIMUM_SYSTEM_VERSION.to_string(),
        enclosure: Enclosure {
            url: asset.browser_download_url.clone(),
            length: asset.size,
            version: version.to_string(),
        },
    }))
}

/// Picks the entry for the newest published release that has an installer.
///
/// Drafts and prereleases are skipped. Scanning stops at the first release
/// that yields an entry.
pub fn select_entry(releases: &[Release]) -> Result<Option<FeedEntry>> {
    for release in releases.iter().filter(|r| !r.draft && !r.prerelease) {
        if let Some(entry) = build_entry(release)? {
            debug!(tag = %release.tag_name, version = %entry.version, "selected release");
            return Ok(Some(entry));
        }
    }

    warn!("No valid releases found");
    Ok(None)
}

/// Renders the appcast document for `owner/name` with at most one item.
pub fn render_appcast(owner: &str, name: &str, entry: Option<&FeedEntry>) -> String {
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="utf-8"?>"#.to_string(),
        r#"<rss version="2.0" xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle" xmlns:dc="http://purl.org/dc/elements/1.1/">"#.to_string(),
        "  <channel>".to_string(),
        format!("    <title>{}</title>", CHANNEL_TITLE),
        format!("    <link>https://{}.github.io/{}/appcast.xml</link>", owner, name),
        format!("    <description>{}</description>", CHANNEL_DESCRIPTION),
        format!("    <language>{}</language>", CHANNEL_LANGUAGE),
    ];

    if let Some(entry) = entry {
        lines.extend(render_item(entry));
    }

    lines.push("  </channel>".to_string());
    lines.push("</rss>".to_string());

    lines.join("\n")
}

fn render_item(entry: &FeedEntry) -> Vec<String> {
    let enclosure = &entry.enclosure;
    vec![
        "    <item>".to_string(),
        format!("      <title>Version {}</title>", entry.version),
        format!("      <link>{}</link>", entry.release_url),
        format!("      <sparkle:version>{}</sparkle:version>", entry.version),
        format!(
            "      <sparkle:shortVersionString>{}</sparkle:shortVersionString>",
            entry.version
        ),
        "      <description><![CDATA[".to_string(),
        format!("        {}", entry.notes_html),
        "      ]]></description>".to_string(),
        format!("      <pubDate>{}</pubDate>", entry.pub_date),
        format!(
            "      <sparkle:minimumSystemVersion>{}</sparkle:minimumSystemVersion>",
            entry.minimum_system_version
        ),
        "      <enclosure ".to_string(),
        format!("        url=\"{}\" ", enclosure.url),
        format!("        sparkle:version=\"{}\" ", enclosure.version),
        format!("        sparkle:shortVersionString=\"{}\" ", enclosure.version),
        format!("        length=\"{}\" ", enclosure.length),
        "        type=\"application/octet-stream\" />".to_string(),
        "    </item>".to_string(),
    ]
}

/// Selects the newest qualifying release and renders the full document.
pub fn generate_appcast(releases: &[Release], owner: &str, name: &str) -> Result<String> {
    let entry = select_entry(releases)?;
    Ok(render_appcast(owner, name, entry.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Asset;

    fn release(tag: &str) -> Release {
        Release {
            tag_name: tag.to_string(),
            name: None,
            body: Some("**Hello**".to_string()),
            prerelease: false,
            draft: false,
            html_url: format!("https://github.com/xmannv/xkey/releases/tag/{}", tag),
            published_at: Some("2024-01-15T10:00:00Z".to_string()),
            created_at: None,
            assets: vec![Asset {
                name: "XKey.dmg".to_string(),
                browser_download_url: format!(
                    "https://github.com/xmannv/xkey/releases/download/{}/XKey.dmg",
                    tag
                ),
                size: 1000,
            }],
        }
    }

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_tag("v1.2.3"), "1.2.3");
        assert_eq!(version_from_tag("1.2.3"), "1.2.3");
        assert_eq!(version_from_tag("vv1"), "v1");
    }

    #[test]
    fn test_build_entry() {
        let entry = build_entry(&release("v2.0.0")).unwrap().unwrap();

        assert_eq!(entry.version, "2.0.0");
        assert_eq!(entry.pub_date, "Mon, 15 Jan 2024 10:00:00 +0000");
        assert_eq!(entry.minimum_system_version, "12.0");
        assert_eq!(entry.enclosure.length, 1000);
        assert_eq!(entry.enclosure.version, "2.0.0");
        assert_eq!(
            entry.notes_html,
            "<p><strong>Hello</strong></p>\n<p><a href=\"https://github.com/xmannv/xkey/releases/tag/v2.0.0\">Xem chi tiết trên GitHub</a></p>"
        );
    }

    #[test]
    fn test_empty_notes_get_no_link() {
        let mut r = release("v1.0.0");
        r.body = None;
        assert_eq!(build_entry(&r).unwrap().unwrap().notes_html, "");

        r.body = Some("\n\n".to_string());
        assert_eq!(build_entry(&r).unwrap().unwrap().notes_html, "");
    }

    #[test]
    fn test_created_at_fallback() {
        let mut r = release("v1.0.0");
        r.published_at = None;
        r.created_at = Some("2024-02-01T12:30:00Z".to_string());

        let entry = build_entry(&r).unwrap().unwrap();
        assert_eq!(entry.pub_date, "Thu, 01 Feb 2024 12:30:00 +0000");
    }

    #[test]
    fn test_missing_timestamp_is_an_error() {
        let mut r = release("v1.0.0");
        r.published_at = None;

        assert!(matches!(build_entry(&r), Err(AppcastError::MissingTimestamp(tag)) if tag == "v1.0.0"));
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let mut r = release("v1.0.0");
        r.published_at = Some("15/01/2024".to_string());

        assert!(matches!(build_entry(&r), Err(AppcastError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_bare_marker_tag_is_skipped() {
        assert!(build_entry(&release("v")).unwrap().is_none());
    }

    #[test]
    fn test_select_entry_skips_drafts_prereleases_and_missing_assets() {
        let mut draft = release("v4.0.0");
        draft.draft = true;
        let mut beta = release("v3.1.0-beta");
        beta.prerelease = true;
        let mut no_dmg = release("v3.0.0");
        no_dmg.assets.clear();
        let releases = vec![draft, beta, no_dmg, release("v2.0.0"), release("v1.0.0")];

        let entry = select_entry(&releases).unwrap().unwrap();
        assert_eq!(entry.version, "2.0.0");
    }

    #[test]
    fn test_select_entry_none() {
        let mut draft = release("v1.0.0");
        draft.draft = true;

        assert!(select_entry(&[]).unwrap().is_none());
        assert!(select_entry(&[draft]).unwrap().is_none());
    }

    #[test]
    fn test_skipped_releases_are_not_validated() {
        let mut draft = release("v2.0.0");
        draft.draft = true;
        draft.published_at = Some("garbage".to_string());

        let entry = select_entry(&[draft, release("v1.0.0")]).unwrap().unwrap();
        assert_eq!(entry.version, "1.0.0");
    }

    #[test]
    fn test_render_empty_channel() {
        let xml = render_appcast("xmannv", "xkey", None);

        assert_eq!(
            xml,
            [
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<rss version="2.0" xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle" xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
                "  <channel>",
                "    <title>XKey Updates</title>",
                "    <link>https://xmannv.github.io/xkey/appcast.xml</link>",
                "    <description>XKey - Vietnamese Input Method for macOS</description>",
                "    <language>vi</language>",
                "  </channel>",
                "</rss>",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_render_item() {
        let entry = build_entry(&release("v2.0.0")).unwrap().unwrap();
        let xml = render_appcast("xmannv", "xkey", Some(&entry));

        assert_eq!(xml.matches("<item>").count(), 1);
        assert!(xml.contains("      <title>Version 2.0.0</title>\n"));
        assert!(xml.contains("      <sparkle:version>2.0.0</sparkle:version>\n"));
        assert!(xml.contains("      <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>\n"));
        assert!(xml.contains("        <p><strong>Hello</strong></p>\n"));
        assert!(xml.contains(
            "        url=\"https://github.com/xmannv/xkey/releases/download/v2.0.0/XKey.dmg\" \n"
        ));
        assert!(xml.contains("        length=\"1000\" \n"));
        assert!(xml.ends_with("    </item>\n  </channel>\n</rss>"));
    }
}
