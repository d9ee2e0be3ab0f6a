//! Server-rendered HTML pages: the lookup form, the result card and the
//! manual paste fallback.
//!
//! Every extracted value is escaped before it is written into markup.

use profile_lens::{LookupResponse, Platform, ProfileIdentity, ProfileLinks};

/// Lookup form shown at `/`.
pub fn index_page() -> String {
    let content = r#"<div class="container">
<h2>Find a profile ID</h2>
<p class="muted">Paste a Facebook or Instagram profile URL, or a handle and pick the platform.</p>
<form method="get" action="/profile" class="lookup">
    <input type="text" name="url" placeholder="https://www.facebook.com/username" autofocus>
    <select name="platform">
        <option value="">Detect from URL</option>
        <option value="facebook">Facebook</option>
        <option value="instagram">Instagram</option>
    </select>
    <button type="submit" class="btn">Look up</button>
</form>
<div class="manual">
<h3>Already have the page source?</h3>
<form method="post" action="/profile/manual">
    <input type="text" name="url" placeholder="Profile URL the source came from">
    <textarea name="html" rows="6" placeholder="Paste page source here"></textarea>
    <button type="submit" class="btn">Extract</button>
</form>
</div>
</div>"#;

    build_page("Lookup", content)
}

/// Shown when a bare handle arrives without a platform.
pub fn platform_choice_page(handle: &str) -> String {
    let h = html_escape(handle);
    let content = format!(
        r#"<div class="container">
<h2>Which platform?</h2>
<p class="muted"><strong>{h}</strong> is not a URL. Choose where to look it up.</p>
<form method="get" action="/profile" class="lookup">
    <input type="hidden" name="url" value="{h}">
    <button type="submit" name="platform" value="facebook" class="btn">Facebook</button>
    <button type="submit" name="platform" value="instagram" class="btn">Instagram</button>
</form>
<p><a href="/">Start over</a></p>
</div>"#
    );

    build_page("Choose platform", &content)
}

/// Result of a lookup. `attempted_url` is the URL the lookup ran against;
/// it seeds the manual fallback when the lookup failed.
pub fn result_page(resp: &LookupResponse, attempted_url: &str) -> String {
    let body = match (&resp.profile, &resp.links) {
        (Some(profile), Some(links)) if resp.success => profile_card(profile, links),
        _ => failure_section(resp, attempted_url),
    };
    let content = format!(
        r#"<div class="container">{body}<p><a href="/">New lookup</a></p></div>"#
    );

    let title = if resp.success { "Profile" } else { "Lookup failed" };
    build_page(title, &content)
}

fn profile_card(profile: &ProfileIdentity, links: &ProfileLinks) -> String {
    let name = html_escape(profile.name.as_deref().unwrap_or("Unknown"));
    let username = match &profile.username {
        Some(u) => format!(r#"<p class="handle">@{}</p>"#, html_escape(u)),
        None => String::new(),
    };
    let photo = match &profile.profile_photo {
        Some(src) => format!(
            r#"<img class="avatar" src="{}" alt="{name}" referrerpolicy="no-referrer">"#,
            html_escape(src)
        ),
        None => r#"<div class="avatar empty">No profile photo available</div>"#.to_string(),
    };

    let mut buttons = vec![link_button(profile.platform.label(), &links.profile)];
    match profile.platform {
        Platform::Facebook => {
            if let Some(m) = &links.marketplace {
                buttons.push(link_button("Marketplace", m));
            }
        }
        Platform::Instagram => match &links.threads {
            Some(t) => buttons.push(link_button("Threads", t)),
            None => buttons.push(
                r#"<span class="btn disabled" title="No username found">Threads</span>"#
                    .to_string(),
            ),
        },
    }
    buttons.push(link_button("Wayback", &links.wayback));

    format!(
        r#"<div class="card">
    {photo}
    <div class="details">
        <h2>{name}</h2>
        {username}
        <p class="id-row"><span class="label">{label} ID</span>
            <code id="profile-id">{id}</code>
            <button type="button" class="btn small" onclick="navigator.clipboard.writeText(document.getElementById('profile-id').textContent)">Copy</button>
        </p>
        <div class="actions">{buttons}</div>
    </div>
</div>"#,
        label = profile.platform.label(),
        id = html_escape(&profile.id),
        buttons = buttons.join(""),
    )
}

fn failure_section(resp: &LookupResponse, attempted_url: &str) -> String {
    let message = html_escape(resp.error.as_deref().unwrap_or("Lookup failed"));
    let mut out = format!(r#"<div class="error-banner">{message}</div>"#);
    if resp.offers_manual_fallback() && !attempted_url.is_empty() {
        out.push_str(&manual_form(attempted_url));
    }
    out
}

/// Paste form for the manual fallback. Posts to `/profile/manual`.
fn manual_form(url: &str) -> String {
    let u = html_escape(url);
    format!(
        r#"<div class="manual">
<h3>Try it manually</h3>
<ol>
    <li>Open <a href="view-source:{u}" target="_blank" rel="noopener">view-source:{u}</a> in your browser while logged in.</li>
    <li>Select all of the page source and copy it.</li>
    <li>Paste it below and extract.</li>
</ol>
<form method="post" action="/profile/manual">
    <input type="hidden" name="url" value="{u}">
    <textarea name="html" rows="10" placeholder="Paste page source here"></textarea>
    <button type="submit" class="btn">Extract</button>
</form>
</div>"#
    )
}

/// Plain-text rendering for the terminal: one line per field, then links.
pub fn summary_lines(resp: &LookupResponse) -> Vec<String> {
    let (Some(profile), true) = (&resp.profile, resp.success) else {
        return vec![format!(
            "Error: {}",
            resp.error.as_deref().unwrap_or("Lookup failed")
        )];
    };

    let mut lines = vec![
        format!("Platform:  {}", profile.platform.label()),
        format!("ID:        {}", profile.id),
        format!("Name:      {}", profile.name.as_deref().unwrap_or("Unknown")),
    ];
    if let Some(u) = &profile.username {
        lines.push(format!("Username:  @{u}"));
    }
    lines.push(format!(
        "Photo:     {}",
        profile
            .profile_photo
            .as_deref()
            .unwrap_or("No profile photo available")
    ));
    if let Some(links) = &resp.links {
        lines.push(format!("Profile:   {}", links.profile));
        if let Some(m) = &links.marketplace {
            lines.push(format!("Market:    {m}"));
        }
        if let Some(t) = &links.threads {
            lines.push(format!("Threads:   {t}"));
        }
        lines.push(format!("Wayback:   {}", links.wayback));
    }
    lines
}

fn link_button(label: &str, href: &str) -> String {
    format!(
        r#"<a class="btn" href="{}" target="_blank" rel="noopener">{}</a>"#,
        html_escape(href),
        html_escape(label)
    )
}

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - ProfileLens</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}}
.header{{background:#1a1a1a;color:#fff;padding:12px 24px;}}
.header h1{{font-size:18px;font-weight:600;}}
.header a{{color:#fff;text-decoration:none;}}
.container{{max-width:720px;margin:0 auto;padding:24px;}}
.container h2{{margin-bottom:12px;}}
.container p{{margin:12px 0;}}
.muted{{color:#666;font-size:14px;}}
.lookup{{display:flex;gap:8px;flex-wrap:wrap;}}
.lookup input[type=text]{{flex:1;min-width:240px;padding:8px;border:1px solid #ccc;border-radius:4px;}}
.btn{{display:inline-block;padding:6px 16px;background:#0066cc;color:#fff;border:none;border-radius:4px;text-decoration:none;font-size:13px;cursor:pointer;margin-right:6px;}}
.btn:hover{{background:#004499;}}
.btn.small{{padding:2px 8px;font-size:11px;}}
.btn.disabled{{background:#bbb;cursor:not-allowed;}}
.card{{display:flex;gap:20px;background:#fff;border:1px solid #e0e0e0;border-radius:8px;padding:20px;}}
.avatar{{width:120px;height:120px;border-radius:50%;object-fit:cover;flex-shrink:0;}}
.avatar.empty{{display:flex;align-items:center;justify-content:center;text-align:center;background:#eee;color:#888;font-size:12px;padding:12px;}}
.handle{{color:#666;}}
.label{{font-size:12px;color:#888;margin-right:6px;}}
.actions{{margin-top:12px;}}
.error-banner{{background:#fce4ec;border:1px solid #f8bbd0;padding:8px 12px;border-radius:4px;color:#c62828;margin-bottom:16px;}}
.manual ol{{margin:8px 0 12px 20px;font-size:14px;}}
.manual input[type=text]{{width:100%;padding:8px;border:1px solid #ccc;border-radius:4px;margin-bottom:8px;}}
.manual h3{{margin:20px 0 8px;}}
.manual textarea{{width:100%;font-family:monospace;font-size:12px;padding:8px;border:1px solid #ccc;border-radius:4px;margin-bottom:8px;}}
</style>
</head>
<body>
<div class="header"><h1><a href="/">ProfileLens</a></h1></div>
{content}
</body>
</html>"#
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_lens::{LensError, TransportError};

    fn instagram(username: Option<&str>) -> LookupResponse {
        LookupResponse::found(ProfileIdentity {
            platform: Platform::Instagram,
            id: "123456789".into(),
            name: Some("John Doe".into()),
            username: username.map(str::to_string),
            profile_photo: None,
        })
    }

    #[test]
    fn test_instagram_card_buttons() {
        let html = result_page(&instagram(Some("johndoe")), "https://www.instagram.com/johndoe");
        assert!(html.contains("Instagram ID"));
        assert!(html.contains("@johndoe"));
        assert!(html.contains("https://www.threads.com/@johndoe"));
        assert!(html.contains("https://web.archive.org/web/https://www.instagram.com/johndoe"));
        assert!(html.contains("No profile photo available"));
        assert!(!html.contains("Marketplace"));
    }

    #[test]
    fn test_threads_disabled_without_username() {
        let html = result_page(&instagram(None), "https://www.instagram.com/x");
        assert!(html.contains(r#"<span class="btn disabled""#));
        assert!(!html.contains("threads.com"));
    }

    #[test]
    fn test_facebook_card_has_marketplace() {
        let resp = LookupResponse::found(ProfileIdentity {
            platform: Platform::Facebook,
            id: "100004567891234".into(),
            name: None,
            username: None,
            profile_photo: Some("https://cdn.example/p.jpg?a=1&b=2".into()),
        });
        let html = result_page(&resp, "https://www.facebook.com/jane");
        assert!(html.contains("Facebook ID"));
        assert!(html.contains("<h2>Unknown</h2>"));
        assert!(html.contains("marketplace/profile/100004567891234"));
        assert!(html.contains(r#"src="https://cdn.example/p.jpg?a=1&amp;b=2""#));
    }

    #[test]
    fn test_values_are_escaped() {
        let resp = LookupResponse::found(ProfileIdentity {
            platform: Platform::Facebook,
            id: "100004567891234".into(),
            name: Some("<script>alert(1)</script>".into()),
            username: None,
            profile_photo: None,
        });
        let html = result_page(&resp, "https://www.facebook.com/x");
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_failure_offers_manual_form() {
        let resp = LookupResponse::failed(&LensError::Transport(TransportError::Status(403)));
        let html = result_page(&resp, "https://www.facebook.com/jane");
        assert!(html.contains("Platform returned 403"));
        assert!(html.contains("view-source:https://www.facebook.com/jane"));
        assert!(html.contains(r#"action="/profile/manual""#));
    }

    #[test]
    fn test_missing_url_has_no_manual_form() {
        let html = result_page(&LookupResponse::failed(&LensError::MissingUrl), "");
        assert!(html.contains("No URL provided"));
        assert!(!html.contains("/profile/manual"));
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&instagram(Some("johndoe")));
        assert_eq!(lines[0], "Platform:  Instagram");
        assert_eq!(lines[1], "ID:        123456789");
        assert!(lines.contains(&"Username:  @johndoe".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("Threads:")));

        let failed = LookupResponse::failed(&LensError::MissingUrl);
        assert_eq!(summary_lines(&failed), vec!["Error: No URL provided"]);
    }

    #[test]
    fn test_index_has_both_forms() {
        let html = index_page();
        assert!(html.contains(r#"action="/profile""#));
        assert!(html.contains(r#"action="/profile/manual""#));
    }

    #[test]
    fn test_platform_choice_escapes_handle() {
        let html = platform_choice_page("a\"b");
        assert!(html.contains(r#"value="a&quot;b""#));
        assert!(html.contains(r#"value="instagram""#));
    }
}
