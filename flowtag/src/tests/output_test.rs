#[cfg(test)]
mod tests {
    use crate::{
        args::ReportOrder,
        flow_counts::FlowCounts,
        flow_log::scan_flow_log_reader,
        lookup_table::{LookupKey, LookupTable},
        output::ReportWriter,
    };

    const LOOKUP: &str = "443,tcp,https\n80,tcp,web\n80,tcp,http-alt\n8080,tcp,web\n";

    const FLOW_LOG: &str = "\
2 123456789012 eni-1 10.0.0.1 10.0.0.2 443 49153 tcp 1 1 1 1 ACCEPT OK
2 123456789012 eni-1 10.0.0.1 10.0.0.2 80 49154 TCP 1 1 1 1 ACCEPT OK
2 123456789012 eni-1 10.0.0.1 10.0.0.2 9999 49155 udp 1 1 1 1 ACCEPT OK
2 123456789012 eni-1 10.0.0.1 10.0.0.2 443 49156 tcp 1 1 1 1 ACCEPT OK
";

    fn render(counts: &FlowCounts, table: &LookupTable, order: ReportOrder) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = ReportWriter::new(&mut buffer, order);
            writer.write_report(counts, &table.reverse()).unwrap();
            writer.flush_and_close().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_sorted_report_layout() {
        let table = LookupTable::from_reader(LOOKUP.as_bytes()).unwrap();
        let mut counts = FlowCounts::new();
        scan_flow_log_reader(FLOW_LOG.as_bytes(), &table, &mut counts).unwrap();

        let expected = "\
Tag Counts:
Tag,Count
Untagged,1
http-alt,1
https,2
web,1

Port/Protocol Combination Counts:
Port,Protocol,Count
443,tcp,2
80,tcp,1
9999,udp,1

Tag to Port/Protocol Combinations:
Tag: http-alt
 - 80,tcp
Tag: https
 - 443,tcp
Tag: web
 - 80,tcp
 - 8080,tcp
";
        assert_eq!(render(&counts, &table, ReportOrder::Sorted), expected);
    }

    #[test]
    fn test_unordered_report_has_same_lines() {
        let table = LookupTable::from_reader(LOOKUP.as_bytes()).unwrap();
        let mut counts = FlowCounts::new();
        scan_flow_log_reader(FLOW_LOG.as_bytes(), &table, &mut counts).unwrap();

        let sorted = render(&counts, &table, ReportOrder::Sorted);
        let unordered = render(&counts, &table, ReportOrder::Unordered);

        let sections = |report: &str| -> Vec<Vec<String>> {
            report
                .split("\n\n")
                .map(|section| {
                    let mut lines: Vec<String> = section.lines().map(String::from).collect();
                    lines.sort();
                    lines
                })
                .collect()
        };

        // The third section interleaves "Tag:" headers with their
        // combinations, so only line membership is compared.
        assert_eq!(sections(&sorted), sections(&unordered));
        assert!(unordered.starts_with("Tag Counts:\nTag,Count\n"));
    }

    #[test]
    fn test_empty_report_prints_headers_only() {
        let table = LookupTable::new();
        let counts = FlowCounts::new();

        let expected = "\
Tag Counts:
Tag,Count

Port/Protocol Combination Counts:
Port,Protocol,Count

Tag to Port/Protocol Combinations:
";
        assert_eq!(render(&counts, &table, ReportOrder::Unordered), expected);
    }

    #[test]
    fn test_combination_with_empty_protocol() {
        let mut counts = FlowCounts::new();
        counts.increment_combination(&LookupKey::new("443", ""));

        let mut buffer = Vec::new();
        {
            let mut writer = ReportWriter::new(&mut buffer, ReportOrder::Sorted);
            writer.write_port_protocol_counts(&counts).unwrap();
            writer.flush_and_close().unwrap();
        }
        let report = String::from_utf8(buffer).unwrap();

        assert_eq!(
            report,
            "Port/Protocol Combination Counts:\nPort,Protocol,Count\n443,,1\n"
        );
    }
}
