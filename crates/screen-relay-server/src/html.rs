//! Embedded HTML surfaces.
//!
//! Pages are rendered from string templates with every interpolated value
//! passed through [`escape`]; session ids and metadata are client-chosen.

use screen_relay_core::{SessionId, SessionRecord};

/// Viewer poll interval in milliseconds.
const REFRESH_MS: u32 = 1000;

/// Escape a string for interpolation into HTML text or attribute context.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Self-contained polling page for one session.
///
/// Fetches the frame once immediately and then on a fixed interval, with a
/// timestamp query parameter so intermediate caches never serve a stale
/// frame. While no blob exists the image request 404s and the placeholder
/// text is shown instead.
#[must_use]
pub fn viewer_page(id: &SessionId) -> String {
    let sid = escape(id.as_str());
    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8"/>
    <title>Viewing {sid}</title>
    <style>
      body {{ background: #111; color: #fff; font-family: system-ui; text-align: center; }}
      img {{ max-width: 95%; border: 1px solid #333; }}
      #placeholder {{ color: #888; margin-top: 2em; display: none; }}
    </style>
  </head>
  <body>
    <h2>Viewing: {sid}</h2>
    <div id="imgwrap">
      <img id="frame" alt="" />
      <div id="placeholder">no frame yet</div>
    </div>
    <script>
      var frameUrl = '/screens/{sid}.jpg';
      var img = document.getElementById('frame');
      var placeholder = document.getElementById('placeholder');
      img.onload = function() {{
        img.style.display = '';
        placeholder.style.display = 'none';
      }};
      img.onerror = function() {{
        img.style.display = 'none';
        placeholder.style.display = 'block';
      }};
      function refresh() {{
        img.src = frameUrl + '?t=' + Date.now();
      }}
      refresh();
      setInterval(refresh, {REFRESH_MS});
    </script>
  </body>
</html>
"#
    )
}

/// Plain session list with pre-filled viewer links.
///
/// The links carry the shared password in the URL; that leak is a documented
/// trade-off inherited from the admin workflow.
#[must_use]
pub fn admin_list(records: &[SessionRecord], password: &str) -> String {
    let mut items = String::new();
    for record in records {
        let sid = escape(record.session_id.as_str());
        let pw = escape(password);
        items.push_str(&format!(
            "<li>{sid} - <a href=\"/view/{sid}?password={pw}\" target=\"_blank\">View</a></li>"
        ));
    }
    format!("<h3>Active Sessions</h3><ul>{items}</ul>")
}

/// Static admin page served at `/` and `/admin`.
///
/// Polls `/sessions` every 5 seconds and lets the operator open a viewer for
/// a hand-typed session id.
pub const ADMIN_PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8"/>
    <title>Screen Relay - Sessions</title>
    <style>
      body { background: #111; color: #eee; font-family: system-ui; margin: 2em; }
      input { background: #222; color: #eee; border: 1px solid #444; padding: 4px 8px; }
      button { padding: 4px 12px; }
      ul { list-style: none; padding: 0; }
      li { padding: 4px 0; border-bottom: 1px solid #222; }
      a { color: #7ab4ff; }
      .empty { color: #888; }
    </style>
  </head>
  <body>
    <h2>Sessions</h2>
    <p>
      <input id="session" placeholder="session id" />
      <input id="password" type="password" placeholder="password" />
      <button id="viewBtn">View</button>
    </p>
    <div id="sessions" class="empty">Loading...</div>
    <script>
      async function fetchSessions() {
        try {
          const res = await fetch('/sessions');
          const data = await res.json();
          const wrap = document.getElementById('sessions');
          wrap.innerHTML = '';
          const keys = Object.keys(data);
          if (keys.length === 0) {
            wrap.innerHTML = '<div class="empty">No active sessions</div>';
            return;
          }
          const ul = document.createElement('ul');
          keys.forEach(k => {
            const li = document.createElement('li');
            const info = data[k];
            const last = new Date(info.last_seen || Date.now()).toLocaleString();
            const has = info.has_image ? '\u{1F7E2}' : '\u{26AA}';
            const strong = document.createElement('strong');
            strong.textContent = k;
            const link = document.createElement('a');
            link.target = '_blank';
            link.textContent = 'View';
            link.href = '/view/' + encodeURIComponent(k) + '?password=' +
              encodeURIComponent(document.getElementById('password').value || '');
            li.appendChild(strong);
            li.appendChild(document.createTextNode(' ' + has + ' last: ' + last + ' '));
            li.appendChild(link);
            ul.appendChild(li);
          });
          wrap.appendChild(ul);
        } catch (e) {
          document.getElementById('sessions').innerText = 'Failed to load';
          console.error(e);
        }
      }

      document.getElementById('viewBtn').addEventListener('click', () => {
        const sid = document.getElementById('session').value.trim();
        const pwd = document.getElementById('password').value;
        if (!sid) return alert('enter session id');
        const url = '/view/' + encodeURIComponent(sid) + '?password=' + encodeURIComponent(pwd);
        window.open(url, '_blank');
      });

      fetchSessions();
      setInterval(fetchSessions, 5000);
    </script>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<img src=x onerror="pwn('&')">"#),
            "&lt;img src=x onerror=&quot;pwn(&#39;&amp;&#39;)&quot;&gt;"
        );
        assert_eq!(escape("sess_a1"), "sess_a1");
    }

    #[test]
    fn viewer_page_polls_the_frame_endpoint() {
        let id = SessionId::parse("sess_a1").unwrap();
        let page = viewer_page(&id);

        assert!(page.contains("/screens/sess_a1.jpg"));
        assert!(page.contains("setInterval(refresh, 1000)"));
        assert!(page.contains("Date.now()"));
        assert!(page.contains("no frame yet"));
    }

    #[test]
    fn admin_list_escapes_the_password() {
        let record = SessionRecord {
            session_id: SessionId::parse("sess_a1").unwrap(),
            last_seen: 0,
            frame_file: "sess_a1.jpg".into(),
            meta: HashMap::new(),
        };

        let html = admin_list(&[record], r#"p<w"#);
        assert!(html.contains("sess_a1"));
        assert!(html.contains("password=p&lt;w"));
        assert!(!html.contains("p<w"));
    }
}
