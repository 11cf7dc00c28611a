use clap::Parser;
use pcm_engine::{
    CancelToken, PcmNode, TransferLoop, TransferSession, negotiate, size_one_period,
};
use pcm_probe::{
    cmdline::*,
    config::{OutputFormat, ProbeConfig},
    report::{NegotiatedReport, RunDocument, write_negotiated, write_stats, write_substream},
    signal::cancel_on_termination,
};
use std::fmt::Write;
use tracing::{info, warn};

struct SimpleRwCmd;

#[derive(Parser, Default)]
#[clap(name = "pcm-simple-rw")]
struct Arguments {
    /// The path to a PCM character device, e.g. /dev/snd/pcmC0D0c.
    path: String,
}

impl ProbeCmd<Arguments> for SimpleRwCmd {
    fn execute(args: Arguments, config: ProbeConfig) -> Result<(), String> {
        let text = config.output == OutputFormat::Text;

        let mut node = PcmNode::open(&args.path).map_err(|err| err.to_string())?;
        let version = node
            .protocol_version()
            .inspect_err(|err| warn!(%err, "protocol version unavailable"))
            .ok();
        if text {
            emit(|w| {
                writeln!(w, "{}", args.path)?;
                write_substream(w, node.info(), version)
            })?;
        }

        let negotiated = negotiate(&mut node).map_err(|err| err.to_string())?;
        let layout = size_one_period(&negotiated).map_err(|err| err.to_string())?;
        let report = NegotiatedReport::new(&negotiated, &layout).map_err(|err| err.to_string())?;
        if text {
            emit(|w| write_negotiated(w, &report))?;
        }

        let cancel = CancelToken::new();
        cancel_on_termination(&cancel).map_err(|errno| format!("sigaction(2): {}", errno.desc()))?;

        let direction = node.direction();
        let session = TransferSession::new(&layout, direction, report.access)
            .map_err(|err| err.to_string())?;
        info!(%direction, bytes = session.byte_len(), "transferring until interrupted");
        let stats = TransferLoop::new(&mut node, session, config.transfer, cancel)
            .run()
            .map_err(|err| err.to_string())?;

        if text {
            emit(|w| write_stats(w, &stats))
        } else {
            emit_json(&RunDocument {
                path: &args.path,
                substream: node.info(),
                protocol_version: version.map(|v| v.to_string()),
                negotiated: report,
                stats,
            })
        }
    }
}

fn main() {
    SimpleRwCmd::run()
}
