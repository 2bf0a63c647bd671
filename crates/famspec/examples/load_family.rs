//! Simple loader to inspect message-family specification files.

use std::path::Path;

use famspec::{Family, OpKind, Operation, ShapeValidator};

fn format_id(op: &Operation) -> String {
    match (op.value(), op.req_value(), op.rsp_value()) {
        (Some(v), _, _) => format!("id {v}"),
        (None, Some(req), Some(rsp)) => format!("req {req} / rsp {rsp}"),
        (None, Some(req), None) => format!("req {req}"),
        (None, None, Some(rsp)) => format!("rsp {rsp}"),
        (None, None, None) => String::from("no id"),
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "family.yaml".to_string());

    println!("Reading: {path}");

    let family =
        Family::from_path(Path::new(&path), &ShapeValidator).expect("Failed to load specification");

    println!("\n=== Family Info ===");
    if let Some(name) = family.name() {
        println!("Name: {name}");
    }
    println!("Protocol: {}", family.proto());

    println!("\n=== Attribute Sets ({}) ===", family.attr_sets().count());
    for set in family.attr_sets() {
        match set.subset_of() {
            Some(parent) => println!("  {} ({} attrs, subset of {})", set.name(), set.len(), parent),
            None => println!("  {} ({} attrs)", set.name(), set.len()),
        }
        for attr in set.attrs() {
            let multi = if attr.is_multi() { " [multi]" } else { "" };
            println!("      {:3}  {}{}", attr.value(), attr.name(), multi);
        }
    }

    println!("\n=== Operations ({}) ===", family.msgs().count());

    let mut calls = 0;
    let mut notifications = 0;
    let mut reserved = 0;
    for op in family.msgs() {
        match op.kind() {
            OpKind::Call => calls += 1,
            OpKind::Notification => notifications += 1,
            OpKind::Reserved => reserved += 1,
        }
    }
    println!("  Calls: {calls}");
    println!("  Notifications: {notifications}");
    println!("  Reserved: {reserved}");

    for op in family.msgs() {
        let kind = match op.kind() {
            OpKind::Call => "call",
            OpKind::Notification => "ntf ",
            OpKind::Reserved => "resv",
        };
        let payload = op
            .attr_set()
            .map(|set| format!(", payload {set}"))
            .unwrap_or_default();
        println!("  [{kind}] {} ({}{payload})", op.name(), format_id(op));
    }

    println!(
        "\nValid requests/responses: {}",
        family.valid_ops().count()
    );
}
