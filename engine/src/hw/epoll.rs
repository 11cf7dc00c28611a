use crate::device::{Readiness, ReadinessWait};
use crate::params::Direction;
use nix::errno::Errno;
use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags};
use std::os::fd::AsFd;
use std::time::Duration;

/// Readiness registration of one PCM file descriptor on its own epoll instance.
#[derive(Debug)]
pub struct EpollWaiter {
    epoll: Epoll,
}

impl EpollWaiter {
    pub fn new<F: AsFd>(fd: F, direction: Direction) -> Result<Self, Errno> {
        let epoll = Epoll::new(EpollCreateFlags::EPOLL_CLOEXEC)?;
        epoll.add(fd, EpollEvent::new(interest(direction), 0))?;
        Ok(Self { epoll })
    }
}

fn interest(direction: Direction) -> EpollFlags {
    match direction {
        Direction::Playback => EpollFlags::EPOLLOUT,
        Direction::Capture => EpollFlags::EPOLLIN,
    }
}

impl ReadinessWait for EpollWaiter {
    const OP: &'static str = "epoll_wait(2)";

    fn wait(&mut self, timeout: Duration) -> Result<Readiness, Errno> {
        let mut events = [EpollEvent::empty()];
        let timeout_ms = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        let count = self.epoll.wait(&mut events, timeout_ms)?;
        if count == 0 {
            return Ok(Readiness::Timeout);
        }
        if events[0].events().contains(EpollFlags::EPOLLERR) {
            Ok(Readiness::Error)
        } else {
            Ok(Readiness::Ready)
        }
    }
}
