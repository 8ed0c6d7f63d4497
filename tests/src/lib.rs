//! End-to-end checks of the contract toolkit against a local stub of the
//! platform API.

pub mod stub_server;

#[cfg(test)]
mod baselines;
#[cfg(test)]
mod contracts;
#[cfg(test)]
mod tracking;

#[cfg(test)]
pub(crate) mod support {
    use crate::stub_server::StubServer;
    use lazy_static::lazy_static;

    lazy_static! {
        pub static ref STUB: StubServer = StubServer::start().expect("the stub server should start");
    }

    pub fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }
}
