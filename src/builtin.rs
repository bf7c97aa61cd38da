use kuchiki::NodeRef;
use maud::{PreEscaped, html};

use crate::dom;

/// Browser side of the theme toggle: same precedence, root attribute and
/// storage key as [`crate::theme`].
pub const THEME_TOGGLE_JS: &str = r#"(function () {
  var storageKey = "theme";
  var root = document.documentElement;

  function systemTheme() {
    try {
      return window.matchMedia && window.matchMedia("(prefers-color-scheme: dark)").matches
        ? "dark"
        : "light";
    } catch (_) {
      return "light";
    }
  }

  function savedTheme() {
    try {
      var v = localStorage.getItem(storageKey);
      return v === "light" || v === "dark" ? v : null;
    } catch (_) {
      return null;
    }
  }

  function button() {
    var b = document.getElementById("theme-toggle");
    if (!b) {
      b = document.createElement("button");
      b.type = "button";
      b.id = "theme-toggle";
      b.className = "btn btn-sm btn-outline-secondary theme-toggle";
      document.body.appendChild(b);
    }
    return b;
  }

  function apply(theme) {
    root.setAttribute("data-bs-theme", theme);
    var next = theme === "dark" ? "light" : "dark";
    var b = button();
    b.textContent = next === "dark" ? "☾" : "☀";
    b.setAttribute("aria-label", "Switch to " + next + " theme");
    b.setAttribute("title", "Switch to " + next + " theme");
  }

  var current = savedTheme() || systemTheme();
  apply(current);

  var b = button();
  if (!b.__themeBound) {
    b.__themeBound = true;
    b.addEventListener("click", function () {
      current = current === "dark" ? "light" : "dark";
      try {
        localStorage.setItem(storageKey, current);
      } catch (_) {}
      apply(current);
    });
  }
})();"#;

/// Browser side of the contact link builder.
pub const CONTACT_JS: &str = r#"(function () {
  var form = document.getElementById("contactFormSimple");
  if (!form) return;
  var emailInput = document.getElementById("contactEmail");
  var messageInput = document.getElementById("contactMessage");
  var gmailLink = document.getElementById("contactGmail");
  var to = form.getAttribute("data-recipient") || "";

  function email() { return emailInput && emailInput.value ? emailInput.value : ""; }
  function body() { return (messageInput && messageInput.value ? messageInput.value : "") + "\n\nFrom: " + email(); }

  form.addEventListener("submit", function (e) {
    e.preventDefault();
    var subject = "Contact via website (" + (email() || "visitor") + ")";
    window.location.href = "mailto:" + encodeURIComponent(to) +
      "?subject=" + encodeURIComponent(subject) + "&body=" + encodeURIComponent(body());
  });

  if (gmailLink) {
    gmailLink.addEventListener("click", function (e) {
      e.preventDefault();
      var href = "https://mail.google.com/mail/?view=cm&fs=1&tf=1" +
        "&to=" + encodeURIComponent(to) +
        "&su=" + encodeURIComponent("Contact via website") +
        "&body=" + encodeURIComponent(body());
      window.open(href, "_blank", "noopener");
    });
  }
})();"#;

/// Appends `<script data-runtime="{name}">` to `<body>` unless the page
/// already carries it. Returns whether a script was added.
pub fn inject_script(doc: &NodeRef, name: &str, source: &str) -> bool {
    let selector = format!(r#"script[data-runtime="{name}"]"#);
    if doc.select_first(&selector).is_ok() {
        return false;
    }
    let Ok(body) = doc.select_first("body") else {
        return false;
    };
    let script = html! {
        script data-runtime=(name) { (PreEscaped(source)) }
    };
    // a lone <script> parses into <head>, so look it up document-wide
    let Some(script) = dom::element(&script.into_string(), "script") else {
        return false;
    };
    body.as_node().append(script);
    true
}
