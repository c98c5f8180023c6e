use std::path::PathBuf;

use clap::Parser;

/// Parses an XML instance document against a bundled demo schema and prints
/// it back out, exercising the parse/print entry points end to end.
///
/// Loading a compiled YANG schema from `.yang`/`.yin` sources is out of
/// scope for this core; a real deployment supplies its own
/// [`yang_data_schema::SchemaContext`] instead of the fixed one this binary
/// builds.
#[derive(Parser, Debug)]
#[clap(name = "yang-data")]
pub struct Cli {
    /// XML instance document to parse.
    pub input: PathBuf,

    /// Emit JSON instead of XML.
    #[clap(long)]
    pub json: bool,

    /// Reject instance elements with no matching schema node instead of
    /// silently skipping them.
    #[clap(long)]
    pub strict: bool,

    /// Indent the XML output.
    #[clap(long)]
    pub formatted: bool,

    /// Skip post-parse leafref/instance-identifier resolution.
    #[clap(long)]
    pub no_resolve: bool,
}
