pub use framecast_core::*;

#[cfg(feature = "transmission")]
pub mod transmission {
    pub use framecast_transmission::*;
}

#[cfg(feature = "codecs")]
pub mod codecs {
    pub use framecast_codecs::*;
}

#[cfg(feature = "capture")]
pub mod capture {
    pub use framecast_capturers::*;
}

#[cfg(feature = "detection")]
pub mod detection {
    pub use framecast_detection::*;
}

#[cfg(feature = "loggers")]
pub mod loggers {
    pub use framecast_loggers::*;
}

#[cfg(feature = "profilation")]
pub mod profilation {
    pub use framecast_profilation_utils::*;
}

#[cfg(feature = "echo")]
pub mod echo {
    pub use framecast_echo::*;
}

#[cfg(feature = "games")]
pub mod games {
    pub use framecast_games::*;
}

/// Buffer holding decoded RGB8 pixels; dimensions travel as the `width`/`height` stats.
pub const RAW_FRAME_BUFFER: &str = "raw_frame_buffer";
