//! Page templates

use super::escape_html;

const BASE_STYLE: &str = r#"    :root { color-scheme: light dark; }
    body { max-width: 800px; margin: 2rem auto; padding: 0 1rem; font-family: system-ui, sans-serif; }
    header { display: flex; align-items: center; justify-content: space-between; gap: 1rem; }
    .row { display: flex; gap: .5rem; margin-top: .75rem; }
    button, a.button { padding: .6rem .9rem; border-radius: .5rem; border: 1px solid #8885; background: #09f; color: white; cursor: pointer; text-decoration: none; display: inline-block; }
    button.secondary { background: transparent; color: inherit; }
    input[type="text"] { flex: 1; width: 100%; padding: .6rem .7rem; border-radius: .5rem; border: 1px solid #8883; }"#;

/// Editor page
///
/// The size hint shown under the form reflects the configured byte limit.
pub fn home_page(max_bytes: usize) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>zanile clipboard</title>
  <meta name="description" content="Minimalist web text clipboard." />
  <style>
{style}
    h1 {{ margin: 0; font-size: 1.2rem; }}
    textarea {{ width: 100%; min-height: 50vh; font: 14px ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; padding: .75rem; border-radius: .5rem; border: 1px solid #8883; box-sizing: border-box; }}
    .row > * {{ flex: 1; }}
    .hint {{ margin-top: .5rem; font-size: .9rem; opacity: .75; }}
    .link {{ margin-top: .75rem; }}
    .err {{ color: #c00; }}
  </style>
</head>
<body>
  <header>
    <h1>zanile clipboard</h1>
    <nav><a href="/about">About</a></nav>
  </header>
  <form id="form">
    <textarea id="text" placeholder="Paste or type text..."></textarea>
    <div class="row">
      <button id="save" type="submit">Save</button>
      <button id="clear" class="secondary" type="button">Clear</button>
    </div>
    <div class="row">
      <input id="id" type="text" placeholder="Optional custom ID (a-z, 0-9, -), default random" />
    </div>
    <div class="hint">Max {limit}. Your note gets a shareable URL.</div>
    <div id="result" class="link"></div>
    <div id="error" class="err"></div>
  </form>
  <script>
    const form = document.getElementById('form');
    const text = document.getElementById('text');
    const idInput = document.getElementById('id');
    const result = document.getElementById('result');
    const error = document.getElementById('error');
    document.getElementById('clear').onclick = () => {{
      text.value = ''; idInput.value = ''; result.textContent = ''; error.textContent = '';
    }};
    form.onsubmit = async (e) => {{
      e.preventDefault();
      result.textContent = ''; error.textContent = '';
      const payload = {{ text: text.value, id: idInput.value || undefined }};
      try {{
        const res = await fetch('/api/create', {{
          method: 'POST',
          headers: {{ 'Content-Type': 'application/json' }},
          body: JSON.stringify(payload),
        }});
        const data = await res.json();
        if (!res.ok) throw new Error(data.error || 'Failed');
        const link = document.createElement('a');
        link.href = data.url;
        link.textContent = data.url;
        result.replaceChildren(link);
        history.replaceState(null, '', '/' + data.id);
      }} catch (err) {{
        error.textContent = String(err.message || err);
      }}
    }};
  </script>
</body>
</html>"#,
        style = BASE_STYLE,
        limit = format_limit(max_bytes),
    )
}

/// Static about page
pub fn about_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>About - zanile clipboard</title>
  <meta name="description" content="About this minimalist clipboard app" />
  <link rel="canonical" href="/about" />
  <style>
{style}
    h1 {{ margin: 0 0 1rem; font-size: 1.4rem; }}
    p, ul {{ line-height: 1.6; }}
  </style>
</head>
<body>
  <header>
    <h1>About</h1>
    <nav><a href="/">Home</a></nav>
  </header>
  <p>
    zanile is a tiny paste-and-share clipboard. Paste some text, save it, and
    pass the short link to whoever needs it.
  </p>
  <p>
    Notes cannot be edited once saved. Depending on how this instance is
    configured they may expire after a while, after which the link simply
    stops working.
  </p>
  <h2>How it works</h2>
  <ul>
    <li><strong>Rust + axum</strong> serve the pages and the JSON API</li>
    <li><strong>libsql</strong> stores each note under its id</li>
    <li><strong>Plain HTML/CSS/JS</strong> for the UI, no build step</li>
  </ul>
  <a class="button" href="/">Create a new note</a>
</body>
</html>"#,
        style = BASE_STYLE,
    )
}

/// Page showing one stored note
///
/// # Arguments
///
/// * `id` - Note id as used in the request path
/// * `text` - Note body; escaped into a `<pre>` block
/// * `origin` - Scheme and authority used for the share and raw URLs
pub fn view_page(id: &str, text: &str, origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let id_html = escape_html(id);
    let share_url = escape_html(&format!("{}/{}", origin, id));
    let raw_url = escape_html(&format!("{}/raw/{}", origin, id));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{id} - zanile</title>
  <meta name="description" content="Shared note {id}" />
  <style>
{style}
    pre {{ white-space: pre-wrap; word-wrap: break-word; background: #00000008; padding: 1rem; border-radius: .5rem; border: 1px solid #8883; }}
  </style>
</head>
<body>
  <h1>note {id}</h1>
  <pre>{text}</pre>
  <div class="row">
    <input id="share" type="text" value="{share_url}" readonly />
    <button type="button" onclick="navigator.clipboard.writeText(document.getElementById('share').value)">Copy URL</button>
    <a class="button" href="/">New</a>
    <a class="button" href="{raw_url}">Raw</a>
  </div>
</body>
</html>"#,
        id = id_html,
        style = BASE_STYLE,
        text = escape_html(text),
        share_url = share_url,
        raw_url = raw_url,
    )
}

/// Human-readable byte limit for the editor hint
fn format_limit(max_bytes: usize) -> String {
    if max_bytes >= 1000 && max_bytes % 1000 == 0 {
        format!("{} KB", max_bytes / 1000)
    } else {
        format!("{} bytes", max_bytes)
    }
}
