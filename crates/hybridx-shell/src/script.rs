//! CSS and JavaScript generated for bridge requests.
//!
//! Every script reports back through `window.__hybridxReply(id, outcome)`
//! when the host installed that hook; outcomes are `ok`, `unavailable` or
//! `error:<message>` (see [`BridgeOutcome::from_report`]).
//!
//! [`BridgeOutcome::from_report`]: crate::bridge::BridgeOutcome::from_report

use crate::bridge::{BridgeRequest, RequestId};
use crate::inset::InsetSnapshot;
use serde_json::Value;

/// `id` of the single `<style>` element owned by the shell.
pub const STYLE_ELEMENT_ID: &str = "hybridx-safe-area";

const VAR_PREFIX: &str = "--hybridx-safe-area-inset";

fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Stylesheet publishing each margin as a custom property, plus a concrete
/// top padding on `body` (`env(safe-area-inset-*)` isn't reliable across
/// renderer versions).
pub fn safe_area_css(insets: &InsetSnapshot) -> String {
    format!(
        ":root{{{p}-top:{t}px;{p}-right:{r}px;{p}-bottom:{b}px;{p}-left:{l}px;}}\
         body{{padding-top:{t}px !important;}}",
        p = VAR_PREFIX,
        t = insets.top,
        r = insets.right,
        b = insets.bottom,
        l = insets.left,
    )
}

fn reply(id: RequestId, outcome_expr: &str) -> String {
    format!(
        "if(typeof window.__hybridxReply==='function'){{window.__hybridxReply({},{});}}",
        id.0, outcome_expr
    )
}

/// JavaScript that performs `request` in the page.
pub fn render(id: RequestId, request: &BridgeRequest) -> String {
    let ok = reply(id, "'ok'");
    let fail = reply(id, "'error:'+String(e)");
    match request {
        BridgeRequest::InjectStyle { css } => format!(
            "(function(){{try{{var el=document.getElementById({sid});\
             if(!el){{el=document.createElement('style');el.id={sid};\
             (document.head||document.documentElement).appendChild(el);}}\
             el.textContent={css};{ok}}}catch(e){{{fail}}}}})();",
            sid = js_string(STYLE_ELEMENT_ID),
            css = js_string(css),
        ),
        BridgeRequest::RemoveStyle => format!(
            "(function(){{try{{var el=document.getElementById({sid});\
             if(el){{el.remove();}}{ok}}}catch(e){{{fail}}}}})();",
            sid = js_string(STYLE_ELEMENT_ID),
        ),
        BridgeRequest::RequestOverlayDisabled => format!(
            "(function(){{var c=window.Capacitor;\
             var p=c&&c.Plugins&&c.Plugins.StatusBar;\
             if(!p||typeof p.setOverlaysWebView!=='function'){{{missing}return;}}\
             Promise.resolve(p.setOverlaysWebView({{overlay:false}}))\
             .then(function(){{{ok}}},function(e){{{fail}}});}})();",
            missing = reply(id, "'unavailable'"),
        ),
    }
}
