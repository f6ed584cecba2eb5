//! Fingerprint overrides for the automated browser
//!
//! A single self-guarding script is registered for every new document and
//! also evaluated against the current one. The user agent override strips the
//! `Headless` token from whatever the browser reports.

use anyhow::{Context, Result};
use chromiumoxide::{Page, cdp};
use tracing::debug;

use super::fingerprint::Fingerprint;

const CONFIG_PLACEHOLDER: &str = "__STEALTHCRAWL_CONFIG__";

/// Overrides applied before page scripts run
///
/// `window.__stealthcrawlApplied` marks a document as patched, so running the
/// script twice is a no-op.
const STEALTH_SCRIPT_TEMPLATE: &str = r#"
(() => {
    if (window.__stealthcrawlApplied) { return; }
    Object.defineProperty(window, '__stealthcrawlApplied', { value: true, enumerable: false });

    const cfg = __STEALTHCRAWL_CONFIG__;
    const define = (obj, prop, getter) => {
        try { Object.defineProperty(obj, prop, { get: getter, configurable: true }); } catch (_) {}
    };

    // navigator
    define(Navigator.prototype, 'webdriver', () => undefined);
    define(Navigator.prototype, 'language', () => cfg.language);
    define(Navigator.prototype, 'languages', () => cfg.languages.slice());
    define(Navigator.prototype, 'platform', () => cfg.platform);
    define(Navigator.prototype, 'hardwareConcurrency', () => cfg.hardwareConcurrency);
    define(Navigator.prototype, 'plugins', () => {
        const names = ['PDF Viewer', 'Chrome PDF Viewer', 'Chromium PDF Viewer',
                       'Microsoft Edge PDF Viewer', 'WebKit built-in PDF'];
        const plugins = names.map(name => ({
            name, filename: 'internal-pdf-viewer', description: 'Portable Document Format', length: 1
        }));
        plugins.item = i => plugins[i] || null;
        plugins.namedItem = n => plugins.find(p => p.name === n) || null;
        plugins.refresh = () => {};
        return plugins;
    });

    // screen
    define(Screen.prototype, 'width', () => cfg.screenWidth);
    define(Screen.prototype, 'height', () => cfg.screenHeight);
    define(Screen.prototype, 'availWidth', () => cfg.screenWidth);
    define(Screen.prototype, 'availHeight', () => cfg.screenHeight - 40);

    // permissions
    if (navigator.permissions && navigator.permissions.query) {
        const originalQuery = navigator.permissions.query.bind(navigator.permissions);
        navigator.permissions.query = (parameters) => {
            if (parameters && parameters.name === 'notifications') {
                return Promise.resolve({ state: Notification.permission, onchange: null });
            }
            if (parameters && parameters.name === 'geolocation') {
                return Promise.resolve({ state: 'granted', onchange: null });
            }
            return originalQuery(parameters);
        };
    }

    // chrome runtime
    if (!window.chrome) {
        Object.defineProperty(window, 'chrome', { value: {}, writable: true, enumerable: true });
    }
    if (!window.chrome.runtime) {
        window.chrome.runtime = { connect: () => {}, sendMessage: () => {}, id: undefined };
    }

    // WebGL vendor/renderer (UNMASKED_VENDOR_WEBGL / UNMASKED_RENDERER_WEBGL)
    const patchWebGl = (proto) => {
        if (!proto) { return; }
        const getParameter = proto.getParameter;
        proto.getParameter = function (param) {
            if (param === 37445) { return cfg.webglVendor; }
            if (param === 37446) { return cfg.webglRenderer; }
            return getParameter.call(this, param);
        };
    };
    patchWebGl(window.WebGLRenderingContext && WebGLRenderingContext.prototype);
    patchWebGl(window.WebGL2RenderingContext && WebGL2RenderingContext.prototype);

    // canvas noise, deterministic within a session
    let state = parseInt(cfg.sessionSeed.slice(0, 8), 16) || 1;
    const nextNoise = () => {
        state ^= state << 13; state ^= state >>> 17; state ^= state << 5;
        return ((state >>> 0) % 3) - 1;
    };
    const toDataURL = HTMLCanvasElement.prototype.toDataURL;
    HTMLCanvasElement.prototype.toDataURL = function (...args) {
        try {
            const ctx = this.getContext('2d');
            if (ctx && this.width > 0 && this.height > 0) {
                const image = ctx.getImageData(0, 0, this.width, this.height);
                for (let i = 0; i < image.data.length; i += 4 * 97) {
                    image.data[i] = Math.max(0, Math.min(255, image.data[i] + nextNoise()));
                }
                ctx.putImageData(image, 0, 0);
            }
        } catch (_) {}
        return toDataURL.apply(this, args);
    };

    // geolocation
    if (navigator.geolocation) {
        const position = () => ({
            coords: {
                latitude: cfg.latitude, longitude: cfg.longitude, accuracy: 50,
                altitude: null, altitudeAccuracy: null, heading: null, speed: null
            },
            timestamp: Date.now()
        });
        navigator.geolocation.getCurrentPosition = (success) => { setTimeout(() => success(position()), 10); };
        navigator.geolocation.watchPosition = (success) => { setTimeout(() => success(position()), 10); return 1; };
    }
})();
"#;

/// Render the stealth script for `fingerprint`
#[must_use]
pub fn stealth_script(fingerprint: &Fingerprint) -> String {
    let config = serde_json::to_string(fingerprint).unwrap_or_else(|_| "{}".to_string());
    STEALTH_SCRIPT_TEMPLATE.replace(CONFIG_PLACEHOLDER, &config)
}

/// Register the stealth script, patch the current document and override the
/// user agent
///
/// Safe to call more than once on the same page.
pub async fn apply_stealth(page: &Page, fingerprint: &Fingerprint) -> Result<()> {
    let source = stealth_script(fingerprint);

    debug!("Registering stealth script for new documents");
    page.execute(
        cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams {
            source: source.clone(),
            include_command_line_api: None,
            world_name: None,
            run_immediately: None,
        },
    )
    .await
    .context("Failed to register stealth script")?;

    // The current document predates the registration
    if let Err(e) = page.evaluate(source).await {
        debug!("Stealth script not applied to current document: {e}");
    }

    let version = page
        .execute(cdp::browser_protocol::browser::GetVersionParams {})
        .await
        .context("Failed to read browser version")?;
    let user_agent = version.user_agent.replace("Headless", "");

    page.execute(cdp::browser_protocol::network::SetUserAgentOverrideParams {
        user_agent,
        accept_language: Some(fingerprint.accept_language.clone()),
        platform: Some(fingerprint.platform.clone()),
        user_agent_metadata: None,
    })
    .await
    .context("Failed to override user agent")?;

    debug!("Stealth overrides applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_fingerprint_and_guard() {
        let fingerprint = Fingerprint::default();
        let script = stealth_script(&fingerprint);
        assert!(!script.contains(CONFIG_PLACEHOLDER));
        assert!(script.contains("__stealthcrawlApplied"));
        assert!(script.contains(&fingerprint.session_seed));
        assert!(script.contains("\"webglVendor\":\"Intel Inc.\""));
    }
}
