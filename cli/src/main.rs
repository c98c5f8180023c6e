mod cli;

use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use yang_data_core::{parse_data_xml, print_data_json, print_data_xml, Options};
use yang_data_schema::{Module, NodeFlags, NodeType, SchemaContext, SchemaNode, Type, TypeBase};

/// A small `ietf-interfaces`-shaped schema, standing in for the compiled
/// schema a real caller would load.
fn demo_schema() -> SchemaContext {
    let mut ctx = SchemaContext::new();
    let m = Module::new("ietf-interfaces", "urn:ietf:params:xml:ns:yang:ietf-interfaces");
    ctx.add_module(Rc::clone(&m));

    let interface = SchemaNode::new("interface", Rc::clone(&m), NodeType::List)
        .with_keys(["name"])
        .with_children([
            SchemaNode::leaf("name", Rc::clone(&m), Rc::new(Type::string())),
            SchemaNode::leaf("description", Rc::clone(&m), Rc::new(Type::string())),
            SchemaNode::leaf("enabled", Rc::clone(&m), Rc::new(Type::builtin(TypeBase::Bool))),
            SchemaNode::leaf_list("mtu", Rc::clone(&m), Rc::new(Type::builtin(TypeBase::Uint32))).with_flags(
                NodeFlags {
                    user_ordered: true,
                    ..NodeFlags::default()
                },
            ),
        ]);

    let interfaces = SchemaNode::new("interfaces", Rc::clone(&m), NodeType::Container).with_child(interface);
    ctx.add_top_level("ietf-interfaces", interfaces)
        .expect("module registered above");
    ctx
}

fn run() -> Result<(), String> {
    let args = cli::Cli::parse();
    let schema = demo_schema();

    let input = std::fs::read_to_string(&args.input).map_err(|e| format!("reading {:?}: {e}", args.input))?;
    let doc = roxmltree::Document::parse(&input).map_err(|e| format!("parsing {:?}: {e}", args.input))?;

    let mut options = Options::empty();
    if args.strict {
        options |= Options::STRICT;
    }
    if args.no_resolve {
        options |= Options::GET;
    }

    let tree = parse_data_xml(&schema, doc.root_element(), options).map_err(|e| e.to_string())?;

    let rendered = if args.json {
        print_data_json(&tree).map_err(|e| e.to_string())?
    } else {
        print_data_xml(&schema, &tree, args.formatted).map_err(|e| e.to_string())?
    };
    println!("{rendered}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
