pub mod ownership_writer;
pub mod request_reader;
