use clap::Parser;
use pcm_engine::{PcmNode, refine_unconstrained};
use pcm_probe::{
    cmdline::*,
    config::{OutputFormat, ProbeConfig},
    report::{CapsDocument, RefinedReport, write_refined, write_substream},
};
use std::fmt::Write;
use tracing::warn;

struct RefineCmd;

#[derive(Parser, Default)]
#[clap(name = "refine-pcm-params")]
struct Arguments {
    /// The path to a PCM character device, e.g. /dev/snd/pcmC0D0p.
    path: String,
}

impl ProbeCmd<Arguments> for RefineCmd {
    fn execute(args: Arguments, config: ProbeConfig) -> Result<(), String> {
        let mut node = PcmNode::open(&args.path).map_err(|err| err.to_string())?;
        let version = node
            .protocol_version()
            .inspect_err(|err| warn!(%err, "protocol version unavailable"))
            .ok();

        if config.output == OutputFormat::Text {
            emit(|w| {
                writeln!(w, "{}", args.path)?;
                write_substream(w, node.info(), version)
            })?;
        }

        let params = refine_unconstrained(&mut node).map_err(|err| err.to_string())?;

        match config.output {
            OutputFormat::Text => emit(|w| write_refined(w, &params)),
            OutputFormat::Json => emit_json(&CapsDocument {
                path: &args.path,
                substream: node.info(),
                protocol_version: version.map(|v| v.to_string()),
                refined: RefinedReport::from(&params),
            }),
        }
    }
}

fn main() {
    RefineCmd::run()
}
