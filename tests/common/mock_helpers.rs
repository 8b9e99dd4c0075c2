//! Scripted device construction helpers

use picolog::backend::ScriptedTransport;
use picolog::dump::FIRMWARE_WORDS_PER_LINE;
use picolog::SampleSeries;

/// A device that acknowledges the probe and then `replies`
pub fn device_with_replies(replies: &[&str]) -> ScriptedTransport {
    ScriptedTransport::new()
        .with_line("cmd=test par=12345")
        .with_lines(replies.iter().copied())
}

/// A device that answers the probe and then dumps `series` the current way
pub fn dumping_device(series: &SampleSeries) -> ScriptedTransport {
    ScriptedTransport::new()
        .with_line("cmd=test par=12345")
        .with_dump_reply(series, FIRMWARE_WORDS_PER_LINE)
}

/// A device running firmware that ends the dump by going quiet
pub fn legacy_dumping_device(series: &SampleSeries) -> ScriptedTransport {
    ScriptedTransport::new()
        .with_line("cmd=test par=12345")
        .with_legacy_dump_reply(&series.values, &series.trailer)
}
