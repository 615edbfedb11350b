//! Self-refreshing carousel view page.

/// Full-viewport image page that reloads `/api/carousel` on a timer.
pub fn carousel_view_page(use_random: bool, refresh_seconds: u64) -> String {
    let random_value = if use_random { "true" } else { "false" };
    let refresh_ms = refresh_seconds * 1000;

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Carousel View</title>
    <style>
      html, body {{
        width: 100%;
        height: 100%;
        margin: 0;
        padding: 0;
        overflow: hidden;
      }}
      img {{
        display: block;
        width: 100vw;
        height: 100vh;
        object-fit: contain;
      }}
    </style>
  </head>
  <body>
    <img id="carousel" alt="carousel" />
    <script>
      const intervalMs = {refresh_ms};
      const image = document.getElementById("carousel");
      const baseUrl = "/api/carousel?random={random_value}";

      function nextUrl() {{
        return `${{baseUrl}}&t=${{Date.now()}}`;
      }}

      function reload() {{
        image.src = nextUrl();
      }}

      reload();
      setInterval(reload, intervalMs);
    </script>
  </body>
</html>
"#
    )
}
