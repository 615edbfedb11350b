//! The moment card page and its message-page fallback.

use html_escape::{encode_double_quoted_attribute, encode_text};
use keepsake_core::images::resolve_stock_name;
use keepsake_core::types::Timestamp;
use keepsake_db::models::moment::Moment;

/// The spiral gallery shows at most this many images.
pub const MAX_VIEW_IMAGES: usize = 6;

const PAGE_CSS: &str = concat!(
    ":root{--card-surface:#fcfcfd;--card-shadow:0 20px 50px rgba(17,24,39,.15);",
    "--muted:#6f7282;--text:#1c1d22;--gap:clamp(10px,1.6vmin,14px)}",
    "html,body{margin:0;min-height:100%;color:var(--text)}",
    "body{font-family:'Avenir Next','Trebuchet MS','Segoe UI',sans-serif;",
    "background:radial-gradient(circle at 14% 20%,#f4f6f8 0,#eef2f4 38%,#e8ecef 100%)}",
    ".page{min-height:100vh;display:grid;place-items:center;padding:20px;box-sizing:border-box}",
    ".canvas{display:grid;justify-items:center;gap:12px;width:100%}",
    ".moment-card{width:min(70vmin,720px,calc(100vw - 30px),calc(100vh - 140px));",
    "aspect-ratio:1/1;background:var(--card-surface);border-radius:24px;padding:clamp(16px,2.7vmin,26px);",
    "box-sizing:border-box;display:grid;grid-template-rows:auto auto minmax(0,1fr);gap:var(--gap);",
    "box-shadow:var(--card-shadow);border:1px solid rgba(255,255,255,.8);overflow:hidden}",
    ".moment-title{margin:0;font-family:'Georgia','Times New Roman',serif;font-size:clamp(30px,5.4vmin,48px);",
    "line-height:1.04;letter-spacing:-.02em;overflow-wrap:anywhere}",
    ".date{margin:0;color:var(--muted);font-size:clamp(12px,1.5vmin,14px)}",
    ".moment-content{min-height:0;display:grid;grid-template-rows:auto minmax(0,1fr);gap:var(--gap)}",
    ".text{margin:0;font-size:clamp(14px,1.9vmin,18px);line-height:1.54;color:#333843;",
    "overflow:auto;max-height:7.7em;padding-right:4px;word-break:break-word}",
    ".media-block{min-height:0;display:grid;grid-template-rows:minmax(0,1fr) auto;gap:8px}",
    ".spiral-grid{min-height:0;height:100%;display:grid;grid-template-columns:repeat(13,minmax(0,1fr));",
    "grid-template-rows:repeat(8,minmax(0,1fr));gap:6px}",
    ".spiral-item{margin:0;position:relative;overflow:hidden;border-radius:10px;background:#e4e8ec}",
    ".spiral-item img{display:block;width:100%;height:100%;object-fit:cover}",
    ".spiral-item .image-unavailable{display:grid;place-items:center;height:100%;margin:0;padding:8px;",
    "color:var(--muted);font-size:12px;background:#f3f4f6}",
    ".spiral-item-1{grid-area:1/1/9/9}",
    ".spiral-item-2{grid-area:1/9/6/14}",
    ".spiral-item-3{grid-area:6/11/9/14}",
    ".spiral-item-4{grid-area:7/9/9/11}",
    ".spiral-item-5{grid-area:6/9/7/10}",
    ".spiral-item-6{grid-area:6/10/7/11}",
    ".spiral-grid.count-1 .spiral-item-1{grid-area:1/1/9/14}",
    ".spiral-grid.count-2 .spiral-item-1{grid-area:1/1/9/9}",
    ".spiral-grid.count-2 .spiral-item-2{grid-area:1/9/9/14}",
    ".spiral-grid.count-3 .spiral-item-3{grid-area:6/9/9/14}",
    ".spiral-grid.count-4 .spiral-item-4{grid-area:6/9/9/11}",
    ".spiral-grid.count-5 .spiral-item-5{grid-area:6/9/7/11}",
    ".gallery-more{margin:0;color:var(--muted);font-size:12px;text-align:right;letter-spacing:.01em}",
    ".nav{display:flex;gap:12px;font-size:13px;color:var(--muted)}",
    ".nav a{color:inherit;text-decoration:none;padding:4px 0;border-bottom:1px solid transparent}",
    ".nav a:hover{border-color:currentColor}",
    ".message-card{width:min(72vmin,520px,calc(100vw - 30px));background:var(--card-surface);",
    "border-radius:20px;padding:22px;box-sizing:border-box;box-shadow:var(--card-shadow)}",
    ".message-card h1{margin:0;font-family:'Georgia','Times New Roman',serif;font-size:clamp(28px,4.6vmin,40px)}",
    ".message-card p{margin:10px 0 0;color:#333843;font-size:16px;line-height:1.5}",
    "@media (max-width:700px){.moment-card{width:min(92vw,calc(100vh - 132px));gap:10px}",
    ".spiral-grid{gap:5px}.nav{font-size:12px;gap:10px}}",
);

/// Image URL on the media path, or `None` when the filename cannot be
/// resolved to a safe basename (the image is then shown unavailable).
pub fn media_image_url(filename: &str) -> Option<String> {
    let (_, image_name) = resolve_stock_name(filename).ok()?;
    Some(format!("/api/images/{image_name}"))
}

fn format_moment_date(value: Timestamp) -> String {
    value.format("%Y-%m-%dT%H:%MZ").to_string()
}

fn to_display_text(value: &str) -> String {
    encode_text(value).replace('\n', "<br />")
}

fn images_html(images: &[String], title: &str) -> String {
    if images.is_empty() {
        return String::new();
    }

    let limited = &images[..images.len().min(MAX_VIEW_IMAGES)];
    let hidden_count = images.len() - limited.len();

    let mut items = String::new();
    for (index, image_name) in limited.iter().enumerate() {
        let position = index + 1;
        let item_class = format!("spiral-item spiral-item-{position}");
        match media_image_url(image_name) {
            None => {
                items.push_str(&format!(
                    "<div class=\"{item_class} spiral-item-unavailable\">\
                     <p class=\"image-unavailable\">image unavailable</p>\
                     </div>"
                ));
            }
            Some(image_url) => {
                let alt_source = format!("{title} image {position}");
                let alt_text = encode_double_quoted_attribute(&alt_source);
                items.push_str(&format!(
                    "<figure class=\"{item_class}\">\
                     <img src=\"{image_url}\" alt=\"{alt_text}\" loading=\"lazy\" \
                     onerror=\"this.onerror=null;this.style.display='none';\
                     this.insertAdjacentHTML('afterend','<p class=&quot;image-unavailable&quot;>image unavailable</p>');\" />\
                     </figure>"
                ));
            }
        }
    }

    let count_class = format!("count-{}", limited.len().clamp(1, MAX_VIEW_IMAGES));
    let more_html = if hidden_count > 0 {
        format!("<p class=\"gallery-more\">+{hidden_count} more</p>")
    } else {
        String::new()
    };

    format!(
        "<section class=\"media-block\">\
         <div class=\"spiral-grid {count_class}\" data-testid=\"moment-gallery\">{items}</div>\
         {more_html}\
         </section>"
    )
}

fn layout_page(
    title: &str,
    body: &str,
    api_link: Option<&str>,
    photostock_timeout_ms: u64,
) -> String {
    let api_item = match api_link {
        Some(link) => format!("<a href=\"{link}\">Open JSON</a>"),
        None => String::new(),
    };

    format!(
        "<!doctype html>\
         <html lang=\"en\">\
         <head>\
         <meta charset=\"utf-8\" />\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\
         <meta name=\"photostock-timeout-ms\" content=\"{photostock_timeout_ms}\" />\
         <title>{title}</title>\
         <style>{PAGE_CSS}</style>\
         </head>\
         <body>\
         <main class=\"page\">\
         <div class=\"canvas\">\
         {body}\
         <nav class=\"nav\"><a href=\"/cards/view\">Latest</a>\
         <a href=\"/cards/view?random=true\">Random</a>{api_item}</nav>\
         </div>\
         </main>\
         </body>\
         </html>",
        title = encode_text(title),
    )
}

/// Full card page for one moment.
pub fn moment_card_page(moment: &Moment, photostock_timeout_ms: u64) -> String {
    let title = if moment.title.is_empty() {
        "Untitled"
    } else {
        moment.title.as_str()
    };

    let text_block = match moment.text.as_deref().filter(|text| !text.is_empty()) {
        Some(text) => format!(
            "<section class=\"text\" data-testid=\"moment-text\">{}</section>",
            to_display_text(text)
        ),
        None => String::new(),
    };

    let body = format!(
        "<article class=\"moment-card\" data-testid=\"moment-card\">\
         <h1 class=\"moment-title\" data-testid=\"moment-title\">{title_html}</h1>\
         <p class=\"date\" data-testid=\"moment-date\">{date}</p>\
         <section class=\"moment-content\">{text_block}{images}</section>\
         </article>",
        title_html = encode_text(title),
        date = encode_text(&format_moment_date(moment.date)),
        images = images_html(&moment.images, title),
    );

    let api_link = format!("/api/v1/cards/{}", moment.id);
    layout_page(title, &body, Some(&api_link), photostock_timeout_ms)
}

/// Standalone message page (empty collection, not found, errors).
pub fn message_page(title: &str, message: &str, photostock_timeout_ms: u64) -> String {
    let body = format!(
        "<article class=\"message-card\">\
         <h1>{title_html}</h1>\
         <p>{message_html}</p>\
         </article>",
        title_html = encode_text(title),
        message_html = encode_text(message),
    );
    layout_page(title, &body, None, photostock_timeout_ms)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use keepsake_db::models::moment::Visibility;

    use super::*;

    fn sample_moment(images: &[&str]) -> Moment {
        Moment {
            id: "65a1b2c3d4e5f60718293a4b".to_string(),
            title: "Trip".to_string(),
            text: Some("line one\nline two".to_string()),
            date: Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap(),
            images: images.iter().map(|v| (*v).to_string()).collect(),
            visibility: Visibility::Public,
            tags: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn card_page_carries_testids_and_date() {
        let page = moment_card_page(&sample_moment(&["IMG_1.jpg"]), 2000);
        assert!(page.contains("data-testid=\"moment-card\""));
        assert!(page.contains("data-testid=\"moment-title\""));
        assert!(page.contains("2026-02-10T12:00Z"));
        assert!(page.contains("/api/v1/cards/65a1b2c3d4e5f60718293a4b"));
        assert!(page.contains("src=\"/api/images/IMG_1\""));
    }

    #[test]
    fn card_page_escapes_title_markup() {
        let mut moment = sample_moment(&["IMG_1.jpg"]);
        moment.title = "<script>x</script>".to_string();
        let page = moment_card_page(&moment, 2000);
        assert!(!page.contains("<script>x</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn text_newlines_become_breaks() {
        let page = moment_card_page(&sample_moment(&["IMG_1.jpg"]), 2000);
        assert!(page.contains("line one<br />line two"));
    }

    #[test]
    fn gallery_caps_at_six_images_and_counts_the_rest() {
        let names: Vec<String> = (1..=8).map(|i| format!("spiral-{i}.jpg")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let page = moment_card_page(&sample_moment(&refs), 2000);

        assert_eq!(page.matches("src=\"/api/images/spiral-").count(), 6);
        assert!(page.contains("+2 more"));
        assert!(page.contains("count-6"));
    }

    #[test]
    fn unresolvable_filename_renders_unavailable_tile() {
        let page = moment_card_page(&sample_moment(&["has space.jpg"]), 2000);
        assert!(page.contains("image unavailable"));
        assert!(!page.contains("/api/images/has"));
    }

    #[test]
    fn message_page_has_no_api_link() {
        let page = message_page("No moments yet", "No moments yet", 2000);
        assert!(page.contains("message-card"));
        assert!(!page.contains("Open JSON"));
    }

    #[test]
    fn media_url_skips_dotted_basenames() {
        assert_eq!(
            media_image_url("IMG_1.jpg"),
            Some("/api/images/IMG_1".to_string())
        );
        assert_eq!(media_image_url("a.b.jpg"), None);
    }
}
