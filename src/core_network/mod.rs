pub mod deadline;
pub mod network;
pub mod pasv;
pub mod port;
pub mod transfer_mode;
