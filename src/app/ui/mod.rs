mod fps;

pub(super) use fps::FpsCounter;
