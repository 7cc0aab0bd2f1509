//! dig-style rendering of a decoded response.

use ferrous_stub_domain::{HeaderFlags, Message, OpCode, ResourceRecord};
use std::fmt::Write;
use std::time::Duration;

pub fn render(message: &Message, elapsed: Duration) -> String {
    let mut out = String::new();
    let header = &message.header;

    let _ = writeln!(
        out,
        ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
        opcode_name(header.flags.opcode),
        header.flags.response_code,
        header.id
    );
    let _ = writeln!(
        out,
        ";; flags:{}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        flag_list(&header.flags),
        header.qdcount,
        header.ancount,
        header.nscount,
        header.arcount
    );

    if !message.questions.is_empty() {
        out.push_str("\n;; QUESTION SECTION:\n");
        for question in &message.questions {
            let _ = writeln!(out, ";{}", question);
        }
    }

    render_section(&mut out, "ANSWER", &message.answers);
    render_section(&mut out, "AUTHORITY", &message.authorities);
    render_section(&mut out, "ADDITIONAL", &message.additionals);

    let _ = writeln!(out, "\n;; Query time: {} msec", elapsed.as_millis());
    out
}

fn render_section(out: &mut String, title: &str, records: &[ResourceRecord]) {
    if records.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n;; {} SECTION:", title);
    for record in records {
        let _ = writeln!(out, "{}", record);
    }
}

fn opcode_name(opcode: OpCode) -> String {
    match opcode {
        OpCode::Query => "QUERY".to_string(),
        OpCode::IQuery => "IQUERY".to_string(),
        OpCode::Status => "STATUS".to_string(),
        OpCode::Notify => "NOTIFY".to_string(),
        OpCode::Update => "UPDATE".to_string(),
        OpCode::Other(code) => format!("OPCODE{}", code),
    }
}

fn flag_list(flags: &HeaderFlags) -> String {
    [
        (flags.response, " qr"),
        (flags.authoritative, " aa"),
        (flags.truncated, " tc"),
        (flags.recursion_desired, " rd"),
        (flags.recursion_available, " ra"),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, name)| name)
    .collect()
}
