use std::io::{self, ErrorKind, IoSlice};

use crate::{Vector, alloc::Allocator};

/// Returns [`ErrorKind::OutOfMemory`] when allocations fail.
impl<A: Allocator> io::Write for Vector<u8, A> {
    #[inline(always)]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.try_extend_from_slice(buf).is_err() {
            return Err(ErrorKind::OutOfMemory.into());
        }

        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let len = bufs.iter().map(|b| b.len()).sum();
        self.try_reserve(len).map_err(|_| ErrorKind::OutOfMemory)?;

        for buf in bufs {
            self.try_extend_from_slice(buf).map_err(|_| ErrorKind::OutOfMemory)?;
        }

        Ok(len)
    }

    #[inline(always)]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.try_extend_from_slice(buf).is_err() {
            return Err(ErrorKind::OutOfMemory.into());
        }

        Ok(())
    }
}
