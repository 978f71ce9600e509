pub mod mega_client;
