use super::plan::RenderPlan;
use super::view::View;
use crate::HIGHLIGHT_BANNER;
use crate::HIGHLIGHT_BLOCKS;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

struct Frame {
    plan: RenderPlan,
    status: String,
    epoch: u64,
}

/// Terminal driver. Owns the latest plan and repaints the whole grid
/// on every change; highlights decay on timers that clear all flags in
/// one sweep. A newer plan supersedes pending fades through the epoch
/// counter, so nothing ever clears a highlight it did not light.
pub struct Screen {
    view: View,
    frame: Arc<Mutex<Frame>>,
}

impl Screen {
    pub fn new(view: View) -> Self {
        Self {
            view,
            frame: Arc::new(Mutex::new(Frame {
                plan: RenderPlan::waiting(),
                status: "connecting".to_string(),
                epoch: 0,
            })),
        }
    }

    /// Paint the empty grid before the first delivery lands.
    pub fn hello(&self) {
        let frame = self.frame.lock().expect("frame lock");
        Self::flush(&self.view, &frame);
    }

    /// Replace the grid with a fresh plan and schedule its fades.
    pub fn apply(&self, plan: RenderPlan) {
        let epoch = {
            let mut frame = self.frame.lock().expect("frame lock");
            frame.epoch += 1;
            frame.plan = plan;
            frame.status = "live".to_string();
            Self::flush(&self.view, &frame);
            frame.epoch
        };
        self.fade_after(epoch, HIGHLIGHT_BANNER, |plan| match plan.refresh {
            true => {
                plan.refresh = false;
                true
            }
            false => false,
        });
        self.fade_after(epoch, HIGHLIGHT_BLOCKS, |plan| match plan.glowing() {
            true => {
                *plan = plan.faded();
                true
            }
            false => false,
        });
    }

    /// Keep the grid as painted and update the connection line.
    pub fn offline(&self, reason: &str) {
        let mut frame = self.frame.lock().expect("frame lock");
        frame.status = format!("offline: {}", reason);
        Self::flush(&self.view, &frame);
    }

    fn fade_after(
        &self,
        epoch: u64,
        delay: std::time::Duration,
        fade: impl FnOnce(&mut RenderPlan) -> bool + Send + 'static,
    ) {
        let shared = Arc::clone(&self.frame);
        let view = self.view.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut frame = shared.lock().expect("frame lock");
            if frame.epoch == epoch && fade(&mut frame.plan) {
                Self::flush(&view, &frame);
            }
        });
    }

    fn flush(view: &View, frame: &Frame) {
        let status = match frame.status.as_str() {
            "live" => frame.status.green().to_string(),
            "connecting" => frame.status.yellow().to_string(),
            _ => frame.status.red().to_string(),
        };
        print!("\x1B[2J\x1B[H{}\n {}\n", view.paint(&frame.plan), status);
        std::io::stdout().flush().ok();
    }
}
