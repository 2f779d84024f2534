pub mod kudu;
