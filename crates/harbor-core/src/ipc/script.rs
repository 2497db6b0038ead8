use crate::ipc::protocol::{BridgeReply, Operation};

/// Name of the page-side object the bridge is exposed on.
pub const BRIDGE_GLOBAL: &str = "harbor";

fn method_name(op: Operation) -> &'static str {
    match op {
        Operation::SelectDirectory => "selectDirectory",
        Operation::WriteFile => "writeFile",
        Operation::GetAppVersion => "getAppVersion",
        Operation::MinimizeWindow => "minimizeWindow",
        Operation::MaximizeWindow => "maximizeWindow",
        Operation::CloseWindow => "closeWindow",
    }
}

fn method_source(op: Operation) -> String {
    let name = method_name(op);
    let wire = op.as_str();
    match op {
        Operation::WriteFile => format!(
            "  api.{name} = function (path, content) {{ return invoke(\"{wire}\", {{ path: String(path), content: String(content) }}); }};\n"
        ),
        op if op.is_one_way() => {
            format!("  api.{name} = function () {{ send(\"{wire}\"); }};\n")
        }
        _ => format!("  api.{name} = function () {{ return invoke(\"{wire}\"); }};\n"),
    }
}

/// Initialization script injected into every window before page scripts run.
///
/// Exposes one method per [`Operation`] on `window.harbor`. Requests return a
/// promise that always resolves with the host's reply object.
pub fn bridge_script() -> String {
    let mut script = String::new();
    script.push_str("(function () {\n");
    script.push_str(&format!("  if (window.{BRIDGE_GLOBAL}) {{ return; }}\n"));
    script.push_str("  var pending = new Map();\n");
    script.push_str("  var nextId = 1;\n");
    script.push_str("  function post(message) { window.ipc.postMessage(JSON.stringify(message)); }\n");
    script.push_str("  function invoke(op, payload) {\n");
    script.push_str("    var id = nextId++;\n");
    script.push_str("    return new Promise(function (resolve) {\n");
    script.push_str("      pending.set(id, resolve);\n");
    script.push_str("      post({ kind: \"invoke\", id: id, op: op, payload: payload || {} });\n");
    script.push_str("    });\n");
    script.push_str("  }\n");
    script.push_str("  function send(op) { post({ kind: \"send\", op: op }); }\n");
    script.push_str("  var api = {};\n");
    for op in Operation::ALL {
        script.push_str(&method_source(op));
    }
    script.push_str("  Object.defineProperty(api, \"__reply\", { value: function (reply) {\n");
    script.push_str("    var resolve = pending.get(reply.id);\n");
    script.push_str("    if (resolve) { pending.delete(reply.id); resolve(reply); }\n");
    script.push_str("  } });\n");
    script.push_str(&format!(
        "  Object.defineProperty(window, \"{BRIDGE_GLOBAL}\", {{ value: Object.freeze(api) }});\n"
    ));
    script.push_str("})();\n");
    script
}

/// Script that settles the page-side promise for `reply`.
pub fn reply_script(reply: &BridgeReply) -> String {
    let json = serde_json::to_string(reply).unwrap_or_else(|e| {
        format!(
            "{{\"id\":{},\"status\":\"rejected\",\"error\":{:?}}}",
            reply.id,
            e.to_string()
        )
    });
    format!("window.{BRIDGE_GLOBAL} && window.{BRIDGE_GLOBAL}.__reply({json});")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::protocol::{CapabilityResponse, DirectorySelection};

    #[test]
    fn test_bridge_exposes_every_operation() {
        let script = bridge_script();
        for op in Operation::ALL {
            assert!(
                script.contains(&format!("api.{} =", method_name(op))),
                "missing method for {op}"
            );
            assert!(script.contains(&format!("\"{}\"", op.as_str())));
        }
    }

    #[test]
    fn test_one_way_methods_do_not_return_promises() {
        let script = bridge_script();
        assert!(script.contains("api.closeWindow = function () { send(\"close-window\"); };"));
        assert!(script.contains(
            "api.getAppVersion = function () { return invoke(\"get-app-version\"); };"
        ));
    }

    #[test]
    fn test_reply_script_embeds_json() {
        let reply = BridgeReply::resolved(
            3,
            CapabilityResponse::Directory(DirectorySelection::NoneSelected),
        );
        assert_eq!(
            reply_script(&reply),
            "window.harbor && window.harbor.__reply({\"id\":3,\"status\":\"resolved\",\"result\":{\"kind\":\"none-selected\"}});"
        );
    }
}
