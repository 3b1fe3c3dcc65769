//! Ex command execution

use std::path::Path;

use super::Editor;
use crate::buffer::BufferId;
use crate::command::{BufferTarget, ParsedCommand};
use crate::constants::errors;
use crate::error::{ErrorType, SnoError};
use crate::split::SplitDirection;
use crate::window::default_processors;

fn unsaved(name: &str) -> SnoError {
    SnoError::warning(
        ErrorType::Execution,
        errors::UNSAVED_CHANGES,
        errors::unsaved_changes(name),
    )
}

impl Editor {
    pub async fn execute(&mut self, command: ParsedCommand) -> Result<(), SnoError> {
        match command {
            ParsedCommand::Edit { path, line, bangs } => {
                self.edit(path.as_deref(), line, bangs > 0).await
            }
            ParsedCommand::Write { path, .. } => self.write(path.as_deref()).await,
            ParsedCommand::WriteAll { .. } => self.write_all().await,
            ParsedCommand::Quit { bangs } => self.quit(bangs > 0),
            ParsedCommand::QuitAll { bangs } => self.quit_all(bangs > 0),
            ParsedCommand::WriteQuit { path, bangs } => {
                self.write(path.as_deref()).await?;
                self.quit(bangs > 0)
            }
            ParsedCommand::BufferNext => {
                if let Some(window) = self.windows.active_window_mut() {
                    window.next_buffer();
                }
                Ok(())
            }
            ParsedCommand::BufferPrevious => {
                if let Some(window) = self.windows.active_window_mut() {
                    window.previous_buffer();
                }
                Ok(())
            }
            ParsedCommand::Buffer { target } => self.select_buffer(target),
            ParsedCommand::BufferDelete { bangs } => self.delete_buffer(bangs > 0),
            ParsedCommand::BufferList => {
                self.list_buffers();
                Ok(())
            }
            ParsedCommand::Split { direction, path } => {
                self.split(direction, path.as_deref()).await
            }
            ParsedCommand::Only => {
                let active = self.active_window_id()?;
                let closed = self.windows.only(active)?;
                tracing::debug!(closed = closed.len(), "closed other windows");
                Ok(())
            }
            ParsedCommand::WindowNext => {
                self.windows.focus_next_window();
                Ok(())
            }
            ParsedCommand::WindowPrevious => {
                self.windows.focus_previous_window();
                Ok(())
            }
            ParsedCommand::SetAll => {
                let listing = self.settings.list(&self.config);
                self.output.extend(listing);
                Ok(())
            }
            ParsedCommand::Set { option, value } => self.set(&option, value.as_deref()),
            ParsedCommand::Echo { message } => {
                self.errors.notifications_mut().info(message);
                Ok(())
            }
            ParsedCommand::Messages => {
                self.take_messages();
                if let Some(log) = self.buffers.log_buffer() {
                    let text = log.contents();
                    self.output.extend(text.lines().map(str::to_string));
                }
                Ok(())
            }
            ParsedCommand::Invalid { command, reason } => Err(SnoError::new(
                ErrorType::Parse,
                errors::INVALID_ARGUMENT,
                format!("{command}: {reason}"),
            )),
            ParsedCommand::Unknown { name } => Err(SnoError::new(
                ErrorType::Parse,
                errors::UNKNOWN_COMMAND,
                format!("Not an editor command: {name}"),
            )),
            ParsedCommand::Ambiguous { prefix, matches } => Err(SnoError::new(
                ErrorType::Parse,
                errors::AMBIGUOUS_COMMAND,
                format!("Ambiguous command '{prefix}': {}", matches.join(", ")),
            )),
        }
    }

    fn active_buffer_or_err(&self) -> Result<BufferId, SnoError> {
        self.active_buffer_id()
            .ok_or_else(|| SnoError::invalid_window_op("no active window"))
    }

    fn buffer_name(&self, id: BufferId) -> String {
        self.buffers
            .get(id)
            .map(|b| b.display_name(true))
            .unwrap_or_default()
    }

    // ============================================================
    // Files
    // ============================================================

    async fn edit(&mut self, path: Option<&str>, line: Option<usize>, force: bool) -> Result<(), SnoError> {
        let id = match path {
            Some(path) => {
                let existed = self.buffers.find_by_path(Path::new(path)).is_some();
                let id = self.open_buffer(Path::new(path)).await?;
                let window = self.active_window_id()?;
                if let Some(window) = self.windows.window_mut(window) {
                    window.add_buffer(id);
                    window.switch_to_buffer(id)?;
                }
                if existed && force {
                    self.reload(id, true).await?;
                }
                id
            }
            None => {
                let id = self.active_buffer_or_err()?;
                self.reload(id, force).await?;
                id
            }
        };

        if let Some(line) = line {
            if let Some(window) = self.windows.active_window_mut() {
                window.set_cursor_line(line.saturating_sub(1));
            }
        }

        if let Some(buffer) = self.buffers.get(id) {
            let status = if buffer.is_new() {
                "[New]".to_string()
            } else {
                format!("{}L", buffer.line_count())
            };
            let message = format!("\"{}\" {status}", buffer.display_name(false));
            self.errors.notifications_mut().info(message);
        }
        Ok(())
    }

    /// Re-read a buffer from disk. `force` discards changes and lets a
    /// language server that failed to start, or has since died, try again.
    async fn reload(&mut self, id: BufferId, force: bool) -> Result<(), SnoError> {
        let name = self.buffer_name(id);
        let buffer = self.buffers.get_mut(id).ok_or_else(|| {
            SnoError::new(ErrorType::Internal, errors::BUFFER_NOT_FOUND, "No active buffer")
        })?;
        if buffer.path().is_none() {
            return Err(SnoError::new(
                ErrorType::Execution,
                errors::NO_PATH,
                errors::MSG_NO_FILE_NAME,
            ));
        }
        if buffer.is_dirty() && !force {
            return Err(unsaved(&name));
        }
        let restart = force && buffer.lsp().map_or(true, |client| !client.is_alive());
        if restart {
            buffer.unbind_lsp();
        }
        buffer.load().await?;

        if restart {
            if let Some(abs) = buffer.abs_path().map(Path::to_path_buf) {
                if self.clients.reset(&abs, &self.root).await {
                    tracing::info!(path = %abs.display(), "retrying language server");
                }
                self.attach_language_server(id);
            }
        }
        Ok(())
    }

    async fn write(&mut self, path: Option<&str>) -> Result<(), SnoError> {
        let id = self.active_buffer_or_err()?;
        let buffer = self.buffers.get_mut(id).ok_or_else(|| {
            SnoError::new(ErrorType::Internal, errors::BUFFER_NOT_FOUND, "No active buffer")
        })?;

        let message = match path {
            // A named buffer writes a copy and keeps its own file
            Some(path) if buffer.path().is_some() => {
                buffer.write_to(Path::new(path)).await?;
                format!("\"{path}\" written")
            }
            Some(path) => {
                buffer.set_path(path);
                buffer.save().await?;
                buffer.reindex(self.classifier.as_ref());
                self.attach_language_server(id);
                format!("\"{path}\" written")
            }
            None => {
                buffer.save().await?;
                format!("\"{}\" written", buffer.display_name(false))
            }
        };
        self.errors.notifications_mut().info(message);
        Ok(())
    }

    async fn write_all(&mut self) -> Result<(), SnoError> {
        let mut written = 0;
        let mut failures = Vec::new();
        for id in self.buffers.dirty_buffers() {
            if let Some(buffer) = self.buffers.get_mut(id) {
                match buffer.save().await {
                    Ok(()) => written += 1,
                    Err(e) => failures.push(e),
                }
            }
        }
        for e in failures {
            self.handle_error(e);
        }
        self.errors
            .notifications_mut()
            .info(format!("Wrote {written} buffer(s)"));
        Ok(())
    }

    fn quit(&mut self, force: bool) -> Result<(), SnoError> {
        let window = self.active_window_id()?;
        let buffer = self.active_buffer_or_err()?;
        let last_window = self.windows.window_count() == 1;

        if !force {
            let shown_elsewhere = self
                .windows
                .windows_for_buffer(buffer)
                .iter()
                .any(|&w| w != window);
            let dirty = if last_window {
                self.buffers.dirty_buffers().first().copied()
            } else {
                self.buffers
                    .get(buffer)
                    .filter(|b| b.is_dirty() && !shown_elsewhere)
                    .map(|_| buffer)
            };
            if let Some(dirty) = dirty {
                return Err(unsaved(&self.buffer_name(dirty)));
            }
        }

        self.windows.close_window(window)?;
        if self.windows.is_empty() {
            self.should_quit = true;
        }
        Ok(())
    }

    fn quit_all(&mut self, force: bool) -> Result<(), SnoError> {
        if !force {
            if let Some(&dirty) = self.buffers.dirty_buffers().first() {
                return Err(unsaved(&self.buffer_name(dirty)));
            }
        }
        self.should_quit = true;
        Ok(())
    }

    // ============================================================
    // Buffers
    // ============================================================

    fn select_buffer(&mut self, target: BufferTarget) -> Result<(), SnoError> {
        let window = self
            .windows
            .active_window_mut()
            .ok_or_else(|| SnoError::invalid_window_op("no active window"))?;
        let found = match &target {
            BufferTarget::Index(n) => window.select_buffer_by_index(n.saturating_sub(1)),
            BufferTarget::Name(name) => window.select_buffer_by_name(name, &self.buffers),
        };
        match found {
            Some(_) => Ok(()),
            None => {
                let wanted = match target {
                    BufferTarget::Index(n) => n.to_string(),
                    BufferTarget::Name(name) => name,
                };
                Err(SnoError::new(
                    ErrorType::Execution,
                    errors::BUFFER_NOT_FOUND,
                    format!("No matching buffer for {wanted}"),
                ))
            }
        }
    }

    /// Remove the active buffer from every window. A window left without
    /// buffers closes; when that was the last window a fresh empty buffer
    /// takes its place.
    fn delete_buffer(&mut self, force: bool) -> Result<(), SnoError> {
        let id = self.active_buffer_or_err()?;
        if !force && self.buffers.get(id).is_some_and(|b| b.is_dirty()) {
            return Err(unsaved(&self.buffer_name(id)));
        }

        for window in self.windows.windows_for_buffer(id) {
            let removed = self
                .windows
                .window_mut(window)
                .is_some_and(|w| w.remove_buffer(id));
            if !removed {
                self.windows.close_window(window)?;
            }
        }
        if self.windows.is_empty() {
            let fresh = self.buffers.create_empty();
            self.windows.create_window(fresh)?;
        }

        if id != self.buffers.log_buffer_id() {
            if let Some(mut buffer) = self.buffers.remove(id) {
                buffer.close();
            }
        }
        Ok(())
    }

    fn list_buffers(&mut self) {
        let Some(window) = self.windows.active_window() else {
            return;
        };
        let active = window.active_buffer();
        let lines: Vec<String> = window
            .buffers()
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| {
                let info = self.buffers.info(id)?;
                Some(format!(
                    "{:>3} {}{}{} \"{}\"",
                    index + 1,
                    if id == active { '%' } else { ' ' },
                    if info.is_read_only { '-' } else { ' ' },
                    if info.is_dirty { '+' } else { ' ' },
                    info.name
                ))
            })
            .collect();
        self.output.extend(lines);
    }

    // ============================================================
    // Windows and options
    // ============================================================

    async fn split(&mut self, direction: SplitDirection, path: Option<&str>) -> Result<(), SnoError> {
        let target = self.active_window_id()?;
        let buffer = match path {
            Some(p) => Some(self.open_buffer(Path::new(p)).await?),
            None => None,
        };
        self.windows.split(target, direction, buffer)?;
        Ok(())
    }

    /// `:set name value` assigns. Without a value the option is shown;
    /// the parser has already turned `:set name` for a boolean into
    /// `true`.
    fn set(&mut self, option: &str, value: Option<&str>) -> Result<(), SnoError> {
        let Some(value) = value else {
            let shown = self.settings.show(option, &self.config)?;
            self.output.push(shown);
            return Ok(());
        };
        self.settings
            .execute_setting(option, Some(value), &mut self.config)?;
        self.windows
            .set_default_processors(default_processors(&self.config));
        Ok(())
    }
}
