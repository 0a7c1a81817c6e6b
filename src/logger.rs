pub(crate) static LOGGER: Logger = Logger;

pub(crate) struct Logger;

impl log::Log for Logger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        eprintln!(
            "[{}] - [{}] - {}",
            record.target(),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}
