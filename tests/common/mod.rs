#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::bail;
use csdkit::error::Result as CommandResult;
use csdkit::host::{CompositeRule, PhotoBlock, PhotoImage};
use csdkit::window_system::{Atom, CaptureRect, ClientMessage, Snapshot, WindowId, WindowSystem};

pub const ROOT: WindowId = 0x1e5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    InternAtom(String),
    ChangeProperty {
        window: WindowId,
        property: Atom,
        type_: Atom,
        data: Vec<u32>,
    },
    SendClientMessage {
        destination: WindowId,
        event_mask: u32,
        message: ClientMessage,
    },
    GetImage {
        window: WindowId,
        rect: CaptureRect,
    },
    Flush,
}

/// Window system that records every request and serves synthetic pixels
pub struct FakeWindowSystem {
    requests: RefCell<Vec<Request>>,
    atoms: RefCell<HashMap<String, Atom>>,
    /// Row-major source pixels; sampled modulo `source_width`
    source: Vec<u32>,
    source_width: u32,
    pub fail_get_image: bool,
    released: Rc<Cell<usize>>,
}

impl FakeWindowSystem {
    pub fn new() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            atoms: RefCell::new(HashMap::new()),
            source: vec![0x336699],
            source_width: 1,
            fail_get_image: false,
            released: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_pixels(width: u32, pixels: Vec<u32>) -> Self {
        Self {
            source: pixels,
            source_width: width,
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn atom(&self, name: &str) -> Option<Atom> {
        self.atoms.borrow().get(name).copied()
    }

    pub fn snapshots_released(&self) -> usize {
        self.released.get()
    }

    pub fn get_image_count(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| matches!(r, Request::GetImage { .. }))
            .count()
    }
}

impl WindowSystem for FakeWindowSystem {
    fn root_window(&self) -> WindowId {
        ROOT
    }

    fn intern_atom(&self, name: &str) -> anyhow::Result<Atom> {
        self.requests
            .borrow_mut()
            .push(Request::InternAtom(name.to_string()));
        let mut atoms = self.atoms.borrow_mut();
        let next = 300 + atoms.len() as Atom;
        Ok(*atoms.entry(name.to_string()).or_insert(next))
    }

    fn change_property32(
        &self,
        window: WindowId,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> anyhow::Result<()> {
        self.requests.borrow_mut().push(Request::ChangeProperty {
            window,
            property,
            type_,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn send_client_message(
        &self,
        destination: WindowId,
        event_mask: u32,
        message: ClientMessage,
    ) -> anyhow::Result<()> {
        self.requests.borrow_mut().push(Request::SendClientMessage {
            destination,
            event_mask,
            message,
        });
        Ok(())
    }

    fn get_image(
        &self,
        window: WindowId,
        rect: CaptureRect,
    ) -> anyhow::Result<Box<dyn Snapshot + '_>> {
        self.requests
            .borrow_mut()
            .push(Request::GetImage { window, rect });
        if self.fail_get_image {
            bail!("BadMatch");
        }
        Ok(Box::new(FakeSnapshot {
            width: rect.width,
            height: rect.height,
            source: self.source.clone(),
            source_width: self.source_width,
            released: Rc::clone(&self.released),
        }))
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.requests.borrow_mut().push(Request::Flush);
        Ok(())
    }
}

struct FakeSnapshot {
    width: u32,
    height: u32,
    source: Vec<u32>,
    source_width: u32,
    released: Rc<Cell<usize>>,
}

impl Snapshot for FakeSnapshot {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        let i = (y as usize * self.source_width as usize + x as usize) % self.source.len();
        self.source[i]
    }
}

impl Drop for FakeSnapshot {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Photo that logs the order of operations applied to it
#[derive(Default)]
pub struct RecordingPhoto {
    pub size: (u32, u32),
    pub ops: Vec<String>,
    pub last_block: Vec<u8>,
    pub last_rule: Option<CompositeRule>,
}

impl PhotoImage for RecordingPhoto {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) -> CommandResult<()> {
        self.ops.push(format!("set_size {}x{}", width, height));
        self.size = (width, height);
        Ok(())
    }

    fn put_block(
        &mut self,
        block: &PhotoBlock<'_>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rule: CompositeRule,
    ) -> CommandResult<()> {
        self.ops.push(format!(
            "put_block {}x{} at {},{} region {}x{} pitch {} pixel_size {} offsets {:?} \
             against {}x{}",
            block.width,
            block.height,
            x,
            y,
            width,
            height,
            block.pitch,
            block.pixel_size,
            block.offsets,
            self.size.0,
            self.size.1
        ));
        self.last_block = block.pixels.to_vec();
        self.last_rule = Some(rule);
        Ok(())
    }
}
