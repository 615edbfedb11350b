//! Timeline shell page with the embedded client configuration.

use serde::Serialize;
use serde_json::json;

use crate::config::TimelineConfig;

/// Serialize a value as compact JSON safe for an inline `<script>`
/// block: `</` is escaped so a crafted string cannot close the tag.
fn to_safe_json_script<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}

/// The timeline shell: static markup plus `window.__TIMELINE_CONFIG__`.
pub fn timeline_page(config: &TimelineConfig) -> String {
    let client_config = json!({
        "apiBaseUrl": config.api_base_url,
        "cardsListPath": config.cards_list_path,
        "cardByIdPathTemplate": config.card_by_id_path_template,
        "imagesPath": config.images_path,
        "timerPath": config.timer_path,
        "requestTimeoutMs": config.request_timeout_ms,
        "cacheTtlMs": config.cache_ttl_ms,
        "maxMoments": config.max_moments,
        "batchSize": config.batch_size,
        "maxRetries": config.max_retries,
        "timerSyncIntervalMs": config.timer_sync_interval_ms,
    });
    let config_script = to_safe_json_script(&client_config);

    format!(
        "<!doctype html>\
         <html lang=\"en\">\
         <head>\
         <meta charset=\"utf-8\" />\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\
         <title>Valentine Timeline</title>\
         <link rel=\"stylesheet\" href=\"/static/timeline.css\" />\
         </head>\
         <body>\
         <main class=\"timeline-shell\" id=\"timeline-app\">\
         <section class=\"countdown\" id=\"countdown\" aria-live=\"polite\">\
         <p class=\"countdown-label\">Вместе уже</p>\
         <p class=\"countdown-value\" id=\"countdown-value\">...</p>\
         <p class=\"countdown-meta\" id=\"countdown-meta\"></p>\
         </section>\
         <header class=\"timeline-hero\">\
         <p class=\"timeline-kicker\">Наши моменты</p>\
         <h1>Любовь это все <span aria-hidden=\"true\">&#9825;</span></h1>\
         <p class=\"timeline-subtitle\">То что не получится забыть</p>\
         </header>\
         <p id=\"timeline-status\" class=\"sr-only\" aria-live=\"polite\"></p>\
         <section id=\"timeline\" class=\"timeline\" aria-label=\"Moments timeline\" role=\"list\"></section>\
         <div id=\"timeline-sentinel\" class=\"timeline-sentinel\" aria-hidden=\"true\"></div>\
         </main>\
         <noscript>\
         <section class=\"timeline-noscript\">\
         <h2>JavaScript is required</h2>\
         <p>Please enable JavaScript to view the interactive timeline.</p>\
         </section>\
         </noscript>\
         <script>window.__TIMELINE_CONFIG__={config_script};</script>\
         <script type=\"module\" src=\"/static/timeline-app.mjs\"></script>\
         </body>\
         </html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TimelineConfig {
        TimelineConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_base_url: String::new(),
            cards_list_path: "/api/cards".to_string(),
            card_by_id_path_template: "/api/cards/{id}".to_string(),
            images_path: "/api/images".to_string(),
            timer_path: "/api/timer".to_string(),
            request_timeout_ms: 6000,
            cache_ttl_ms: 45_000,
            max_moments: 500,
            batch_size: 16,
            max_retries: 2,
            timer_sync_interval_ms: 20_000,
            static_dir: "static".to_string(),
        }
    }

    #[test]
    fn embeds_the_client_config() {
        let page = timeline_page(&test_config());
        assert!(page.contains("window.__TIMELINE_CONFIG__="));
        assert!(page.contains("\"cardsListPath\":\"/api/cards\""));
        assert!(page.contains("\"maxMoments\":500"));
    }

    #[test]
    fn script_closing_tags_are_escaped() {
        let mut config = test_config();
        config.api_base_url = "</script><script>alert(1)".to_string();
        let page = timeline_page(&config);
        assert!(!page.contains("</script><script>alert(1)"));
        assert!(page.contains("<\\/script>"));
    }
}
