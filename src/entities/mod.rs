pub mod transport_record;
