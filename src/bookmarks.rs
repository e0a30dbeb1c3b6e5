//! Bookmarks and Reading List access.
//!
//! Safari exports its bookmarks to `~/Library/Safari/Bookmarks.plist`, a
//! tree of dictionaries typed by `WebBookmarkType`. [`Parser`] decodes the
//! raw tree and flattens it into bookmark lists and the three special
//! top-level folders (Bookmarks Bar, Bookmarks Menu, Reading List).

use crate::error::{Result, SafariError};
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// Entry types in Bookmarks.plist.
const TYPE_LEAF: &str = "WebBookmarkTypeLeaf";
const TYPE_LIST: &str = "WebBookmarkTypeList";
const TYPE_PROXY: &str = "WebBookmarkTypeProxy";

/// Titles of the special top-level folders.
const NAME_BOOKMARKS_BAR: &str = "BookmarksBar";
const NAME_BOOKMARKS_MENU: &str = "BookmarksMenu";
const NAME_READING_LIST: &str = "com.apple.ReadingList";

/// Location of Safari's exported bookmarks.
pub fn default_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Library/Safari/Bookmarks.plist"))
        .ok_or(SafariError::NoHomeDir)
}

/// Bookmarks.plist entry as stored on disk.
#[derive(Debug, Default, Deserialize)]
struct RawBookmark {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "WebBookmarkType")]
    entry_type: Option<String>,
    #[serde(rename = "URLString")]
    url: Option<String>,
    #[serde(rename = "WebBookmarkUUID")]
    uuid: Option<String>,
    #[serde(rename = "ReadingList")]
    reading_list: Option<RawReadingList>,
    #[serde(rename = "URIDictionary")]
    uri_dictionary: Option<UriDictionary>,
    #[serde(rename = "Children", default)]
    children: Vec<RawBookmark>,
}

/// Reading List metadata attached to a leaf entry.
#[derive(Debug, Default, Deserialize)]
struct RawReadingList {
    #[serde(rename = "PreviewText")]
    preview_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UriDictionary {
    title: Option<String>,
}

impl RawBookmark {
    /// Display title, falling back to the URI dictionary.
    fn title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.uri_dictionary
                    .as_ref()
                    .and_then(|d| d.title.clone())
            })
            .unwrap_or_default()
    }
}

/// A Safari bookmark.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
    /// Titles of the folders containing this bookmark, outermost first.
    pub ancestors: Vec<String>,
    /// Reading List preview text, empty for ordinary bookmarks.
    pub preview: String,
    pub uid: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum FolderKind {
    #[default]
    Plain,
    BookmarksBar,
    BookmarksMenu,
    ReadingList,
}

/// A folder of bookmarks.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Folder {
    pub title: String,
    /// Titles of the folders containing this one, outermost first.
    pub ancestors: Vec<String>,
    pub bookmarks: Vec<Bookmark>,
    pub folders: Vec<Folder>,
    #[serde(skip)]
    kind: FolderKind,
}

impl Folder {
    /// Whether this folder is the user's Reading List.
    pub fn is_reading_list(&self) -> bool {
        self.kind == FolderKind::ReadingList
    }

    /// Whether this folder is the user's Bookmarks Bar.
    pub fn is_bookmarks_bar(&self) -> bool {
        self.kind == FolderKind::BookmarksBar
    }

    /// Whether this folder is the user's Bookmarks Menu.
    pub fn is_bookmarks_menu(&self) -> bool {
        self.kind == FolderKind::BookmarksMenu
    }
}

/// Parsed Bookmarks.plist.
#[derive(Debug, Default)]
pub struct Parser {
    /// All bookmarks outside the Reading List, flattened.
    pub bookmarks: Vec<Bookmark>,
    /// Reading List bookmarks, flattened.
    pub reading_list_bookmarks: Vec<Bookmark>,
    /// The user's Bookmarks Bar.
    pub bookmarks_bar: Option<Folder>,
    /// The user's Bookmarks Menu.
    pub bookmarks_menu: Option<Folder>,
    /// The user's Reading List.
    pub reading_list: Option<Folder>,
    /// Top-level folders other than the special three.
    pub other_folders: Vec<Folder>,
}

impl Parser {
    /// Parse the default Bookmarks.plist.
    pub fn load() -> Result<Self> {
        Self::from_file(default_path()?)
    }

    /// Parse a Bookmarks.plist file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw: RawBookmark = plist::from_file(path)?;
        Ok(Self::from_raw(raw))
    }

    /// Parse Bookmarks.plist data from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let raw: RawBookmark = plist::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawBookmark) -> Self {
        let mut parser = Self::default();

        for child in &raw.children {
            match child.entry_type.as_deref() {
                Some(TYPE_LIST) => {
                    let title = child.title();
                    let kind = match title.as_str() {
                        NAME_BOOKMARKS_BAR => FolderKind::BookmarksBar,
                        NAME_BOOKMARKS_MENU => FolderKind::BookmarksMenu,
                        NAME_READING_LIST => FolderKind::ReadingList,
                        other => {
                            log::warn!("unknown top-level folder: {}", other);
                            FolderKind::Plain
                        }
                    };

                    let in_reading_list = kind == FolderKind::ReadingList;
                    let folder = parser.build_folder(child, &[], kind, in_reading_list);

                    match kind {
                        FolderKind::BookmarksBar => parser.bookmarks_bar = Some(folder),
                        FolderKind::BookmarksMenu => parser.bookmarks_menu = Some(folder),
                        FolderKind::ReadingList => parser.reading_list = Some(folder),
                        FolderKind::Plain => parser.other_folders.push(folder),
                    }
                }
                // History proxy; always empty
                Some(TYPE_PROXY) => {}
                other => {
                    log::debug!("skipping top-level entry of type {:?}", other);
                }
            }
        }

        parser
    }

    fn build_folder(
        &mut self,
        raw: &RawBookmark,
        ancestors: &[String],
        kind: FolderKind,
        in_reading_list: bool,
    ) -> Folder {
        let title = raw.title();
        let mut folder = Folder {
            title: title.clone(),
            ancestors: ancestors.to_vec(),
            bookmarks: Vec::new(),
            folders: Vec::new(),
            kind,
        };

        let mut child_ancestors = ancestors.to_vec();
        child_ancestors.push(title);

        for child in &raw.children {
            match child.entry_type.as_deref() {
                Some(TYPE_LIST) => {
                    let sub = self.build_folder(
                        child,
                        &child_ancestors,
                        FolderKind::Plain,
                        in_reading_list,
                    );
                    folder.folders.push(sub);
                }
                Some(TYPE_LEAF) => {
                    let bookmark = Bookmark {
                        title: child.title(),
                        url: child.url.clone().unwrap_or_default(),
                        ancestors: child_ancestors.clone(),
                        preview: child
                            .reading_list
                            .as_ref()
                            .and_then(|rl| rl.preview_text.clone())
                            .unwrap_or_default(),
                        uid: child.uuid.clone().unwrap_or_default(),
                    };

                    if in_reading_list {
                        self.reading_list_bookmarks.push(bookmark.clone());
                    } else {
                        self.bookmarks.push(bookmark.clone());
                    }
                    folder.bookmarks.push(bookmark);
                }
                Some(TYPE_PROXY) => {}
                other => {
                    log::debug!("skipping entry of type {:?}", other);
                }
            }
        }

        folder
    }

    /// Every folder, depth-first across all top-level trees.
    pub fn folders(&self) -> Vec<&Folder> {
        let mut all = Vec::new();
        for folder in self
            .bookmarks_bar
            .iter()
            .chain(self.bookmarks_menu.iter())
            .chain(self.reading_list.iter())
            .chain(self.other_folders.iter())
        {
            collect_folders(folder, &mut all);
        }
        all
    }

    /// Bookmarks (outside the Reading List) for which `accept` returns
    /// true.
    pub fn filter(&self, accept: impl Fn(&Bookmark) -> bool) -> Vec<&Bookmark> {
        self.bookmarks.iter().filter(|bm| accept(bm)).collect()
    }
}

fn collect_folders<'a>(folder: &'a Folder, out: &mut Vec<&'a Folder>) {
    out.push(folder);
    for sub in &folder.folders {
        collect_folders(sub, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A Bookmarks.plist with the three special folders, a nested folder,
    /// and a Reading List entry.
    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>WebBookmarkType</key><string>WebBookmarkTypeList</string>
  <key>Title</key><string></string>
  <key>Children</key>
  <array>
    <dict>
      <key>WebBookmarkType</key><string>WebBookmarkTypeProxy</string>
      <key>Title</key><string>History</string>
    </dict>
    <dict>
      <key>WebBookmarkType</key><string>WebBookmarkTypeList</string>
      <key>Title</key><string>BookmarksBar</string>
      <key>Children</key>
      <array>
        <dict>
          <key>WebBookmarkType</key><string>WebBookmarkTypeLeaf</string>
          <key>URLString</key><string>https://www.rust-lang.org/</string>
          <key>WebBookmarkUUID</key><string>UID-1</string>
          <key>URIDictionary</key>
          <dict><key>title</key><string>Rust</string></dict>
        </dict>
        <dict>
          <key>WebBookmarkType</key><string>WebBookmarkTypeList</string>
          <key>Title</key><string>Projects</string>
          <key>Children</key>
          <array>
            <dict>
              <key>WebBookmarkType</key><string>WebBookmarkTypeLeaf</string>
              <key>URLString</key><string>https://crates.io/</string>
              <key>WebBookmarkUUID</key><string>UID-2</string>
              <key>URIDictionary</key>
              <dict><key>title</key><string>Crates</string></dict>
            </dict>
          </array>
        </dict>
      </array>
    </dict>
    <dict>
      <key>WebBookmarkType</key><string>WebBookmarkTypeList</string>
      <key>Title</key><string>BookmarksMenu</string>
      <key>Children</key>
      <array/>
    </dict>
    <dict>
      <key>WebBookmarkType</key><string>WebBookmarkTypeList</string>
      <key>Title</key><string>com.apple.ReadingList</string>
      <key>Children</key>
      <array>
        <dict>
          <key>WebBookmarkType</key><string>WebBookmarkTypeLeaf</string>
          <key>Title</key><string>Article</string>
          <key>URLString</key><string>https://example.com/article</string>
          <key>WebBookmarkUUID</key><string>UID-3</string>
          <key>ReadingList</key>
          <dict><key>PreviewText</key><string>An article worth reading</string></dict>
        </dict>
      </array>
    </dict>
  </array>
</dict>
</plist>
"#;

    fn parse_fixture() -> Parser {
        Parser::from_reader(Cursor::new(FIXTURE.as_bytes())).expect("parse failed")
    }

    #[test]
    fn test_special_folders_recognized() {
        let parser = parse_fixture();

        let bar = parser.bookmarks_bar.as_ref().expect("no BookmarksBar");
        assert!(bar.is_bookmarks_bar());
        assert!(parser
            .bookmarks_menu
            .as_ref()
            .expect("no BookmarksMenu")
            .is_bookmarks_menu());
        assert!(parser
            .reading_list
            .as_ref()
            .expect("no ReadingList")
            .is_reading_list());
        assert!(parser.other_folders.is_empty());
    }

    #[test]
    fn test_bookmarks_flattened() {
        let parser = parse_fixture();

        let titles: Vec<&str> = parser.bookmarks.iter().map(|bm| bm.title.as_str()).collect();
        assert_eq!(titles, vec!["Rust", "Crates"]);

        // Reading List entries stay out of the main list
        assert_eq!(parser.reading_list_bookmarks.len(), 1);
        assert_eq!(
            parser.reading_list_bookmarks[0].preview,
            "An article worth reading"
        );
    }

    #[test]
    fn test_title_falls_back_to_uri_dictionary() {
        let parser = parse_fixture();
        assert_eq!(parser.bookmarks[0].title, "Rust");
        assert_eq!(parser.bookmarks[0].uid, "UID-1");
    }

    #[test]
    fn test_ancestors_record_folder_path() {
        let parser = parse_fixture();

        let crates = parser
            .bookmarks
            .iter()
            .find(|bm| bm.title == "Crates")
            .expect("Crates bookmark missing");
        assert_eq!(crates.ancestors, vec!["BookmarksBar", "Projects"]);
    }

    #[test]
    fn test_folders_walk_all_trees() {
        let parser = parse_fixture();

        let titles: Vec<&str> = parser.folders().iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "BookmarksBar",
                "Projects",
                "BookmarksMenu",
                "com.apple.ReadingList"
            ]
        );
    }

    #[test]
    fn test_filter() {
        let parser = parse_fixture();

        let hits = parser.filter(|bm| bm.url.contains("crates.io"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Crates");
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file failed");
        file.write_all(FIXTURE.as_bytes()).expect("write failed");

        let parser = Parser::from_file(file.path()).expect("parse failed");
        assert_eq!(parser.bookmarks.len(), 2);
    }
}
