use crate::CLAP_STYLING;
use byline_scanner::boundary::PRESSABLE_CONTAINER_ATTR;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("byline")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("byline")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("resolve")
                .about(
                    "Resolve the author of every timestamp in one or more rendered feed \
                pages. Reads stdin when no file is given.",
                )
                .arg(
                    arg!([FILE] ...)
                        .required(false)
                        .help("HTML files to scan ('-' for stdin)"),
                )
                .arg(
                    arg!(-L --"list-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of HTML files to scan")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-s --"selector" <CSS>)
                        .required(false)
                        .help("CSS selector matching timestamp elements")
                        .default_value("time"),
                )
                .arg(
                    arg!(--"boundary-attr" <NAME>)
                        .required(false)
                        .help("Attribute marking the outer element of a single post")
                        .default_value(PRESSABLE_CONTAINER_ATTR),
                )
                .arg(
                    arg!(--"boundary-value" <VALUE>)
                        .required(false)
                        .help("Only treat the boundary attribute as a boundary with this value")
                        .conflicts_with("no-boundary"),
                )
                .arg(
                    arg!(--"no-boundary")
                        .required(false)
                        .help("Climb all the way to the document root")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Treat absolute links to this host (and its subdomains) as site paths")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of documents scanned concurrently.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format")
                        .value_parser(["text", "json", "csv"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("classify")
                .about("Classify hrefs as profile links, permalinks, or unrelated")
                .arg(arg!(<HREF> ...).help("The hrefs to classify"))
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Treat absolute links to this host (and its subdomains) as site paths")
                        .action(clap::ArgAction::Append),
                ),
        )
}
