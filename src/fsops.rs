//! Filesystem steps the pipelines perform directly instead of shelling
//! out: directory creation, dotfile copies, and shell-rc appends. Every
//! helper honors dry-run by tracing the mutation instead of performing it.

use crate::context::Context;
use crate::error::EngineError;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create every directory in the list, parents included.
pub fn ensure_dirs(ctx: &Context, targets: &[PathBuf]) -> Result<(), EngineError> {
    for target in targets {
        if ctx.dry_run {
            println!("\nwould create: {}", target.display());
            continue;
        }
        fs::create_dir_all(target)?;
    }
    Ok(())
}

/// Copy (source, destination) pairs. A `*` in the source file name expands
/// via glob and every match lands in the destination directory; otherwise
/// a destination that is a directory receives the source's file name.
pub fn copy_files(ctx: &Context, targets: &[(PathBuf, PathBuf)]) -> Result<(), EngineError> {
    for (src, dest) in targets {
        if ctx.dry_run {
            println!("\nwould copy: {} -> {}", src.display(), dest.display());
            continue;
        }
        let name = src.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.contains('*') {
            copy_glob(src, dest)?;
        } else {
            copy_one(src, dest)?;
        }
    }
    Ok(())
}

fn copy_glob(pattern_path: &Path, dest: &Path) -> Result<(), EngineError> {
    let pattern = pattern_path.to_string_lossy();
    let entries = glob::glob(&pattern)
        .map_err(|err| EngineError::config(format!("bad copy pattern {pattern}: {err}")))?;
    for entry in entries {
        let file = entry.map_err(|err| EngineError::Io(err.into_error()))?;
        let file_name = file
            .file_name()
            .ok_or_else(|| EngineError::config(format!("no file name in {}", file.display())))?;
        fs::copy(&file, dest.join(file_name))?;
    }
    Ok(())
}

fn copy_one(src: &Path, dest: &Path) -> Result<(), EngineError> {
    let target = if dest.is_dir() {
        match src.file_name() {
            Some(name) => dest.join(name),
            None => return Err(EngineError::config(format!("no file name in {}", src.display()))),
        }
    } else {
        dest.to_path_buf()
    };
    fs::copy(src, target)?;
    Ok(())
}

/// Append the contents of `src` to every destination file, creating
/// destinations that do not exist yet. Used to wire tool support blocks
/// into shell rc files.
pub fn append_file(ctx: &Context, src: &Path, dests: &[PathBuf]) -> Result<(), EngineError> {
    let text = if ctx.dry_run {
        String::new()
    } else {
        fs::read_to_string(src)?
    };
    for dest in dests {
        if ctx.dry_run {
            println!("\nwould append: {} -> {}", src.display(), dest.display());
            continue;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(dest)?;
        file.write_all(text.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MIN_RELEASE;

    fn test_context(dry_run: bool) -> Context {
        let root = PathBuf::from("/nonexistent/assets");
        Context {
            home: PathBuf::from("/nonexistent/home"),
            scripts: root.join("scripts"),
            shell: root.join("shell"),
            system: root.join("system"),
            vim: root.join("vim"),
            ohmyzsh: PathBuf::from("/nonexistent/home/.oh-my-zsh"),
            root,
            min_release: MIN_RELEASE,
            dry_run,
        }
    }

    #[test]
    fn ensure_dirs_creates_nested_paths() {
        let ctx = test_context(false);
        let scratch = tempfile::tempdir().expect("temp dir");
        let nested = scratch.path().join("a/b/c");
        ensure_dirs(&ctx, &[nested.clone()]).expect("create dirs");
        assert!(nested.is_dir());
    }

    #[test]
    fn copy_into_directory_keeps_file_name() {
        let ctx = test_context(false);
        let scratch = tempfile::tempdir().expect("temp dir");
        let src = scratch.path().join("bashrc.txt");
        fs::write(&src, "export A=1\n").expect("write source");
        let dest_dir = scratch.path().join("out");
        fs::create_dir(&dest_dir).expect("create dest");

        copy_files(&ctx, &[(src, dest_dir.clone())]).expect("copy");
        assert_eq!(
            fs::read_to_string(dest_dir.join("bashrc.txt")).unwrap(),
            "export A=1\n"
        );
    }

    #[test]
    fn copy_to_file_path_renames() {
        let ctx = test_context(false);
        let scratch = tempfile::tempdir().expect("temp dir");
        let src = scratch.path().join("profile.txt");
        fs::write(&src, "profile\n").expect("write source");
        let dest = scratch.path().join(".profile");

        copy_files(&ctx, &[(src, dest.clone())]).expect("copy");
        assert_eq!(fs::read_to_string(dest).unwrap(), "profile\n");
    }

    #[test]
    fn wildcard_source_copies_every_match() {
        let ctx = test_context(false);
        let scratch = tempfile::tempdir().expect("temp dir");
        let colors = scratch.path().join("vimcolors");
        fs::create_dir(&colors).expect("create source dir");
        fs::write(colors.join("one.vim"), "1").unwrap();
        fs::write(colors.join("two.vim"), "2").unwrap();
        fs::write(colors.join("ignore.txt"), "x").unwrap();
        let dest = scratch.path().join("dest");
        fs::create_dir(&dest).expect("create dest");

        copy_files(&ctx, &[(colors.join("*.vim"), dest.clone())]).expect("copy");
        assert!(dest.join("one.vim").exists());
        assert!(dest.join("two.vim").exists());
        assert!(!dest.join("ignore.txt").exists());
    }

    #[test]
    fn append_reaches_every_destination() {
        let ctx = test_context(false);
        let scratch = tempfile::tempdir().expect("temp dir");
        let src = scratch.path().join("support.txt");
        fs::write(&src, "eval pyenv\n").unwrap();
        let bashrc = scratch.path().join(".bashrc");
        let zshrc = scratch.path().join(".zshrc");
        fs::write(&bashrc, "existing\n").unwrap();

        append_file(&ctx, &src, &[bashrc.clone(), zshrc.clone()]).expect("append");
        assert_eq!(fs::read_to_string(bashrc).unwrap(), "existing\neval pyenv\n");
        assert_eq!(fs::read_to_string(zshrc).unwrap(), "eval pyenv\n");
    }

    #[test]
    fn dry_run_never_mutates() {
        let ctx = test_context(true);
        let scratch = tempfile::tempdir().expect("temp dir");
        let dir = scratch.path().join("never");
        let src = scratch.path().join("missing-source.txt");
        let dest = scratch.path().join("never.txt");

        ensure_dirs(&ctx, &[dir.clone()]).expect("dry-run dirs");
        copy_files(&ctx, &[(src.clone(), dest.clone())]).expect("dry-run copy");
        append_file(&ctx, &src, &[dest.clone()]).expect("dry-run append");
        assert!(!dir.exists());
        assert!(!dest.exists());
    }
}
