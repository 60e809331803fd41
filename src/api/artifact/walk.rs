//! Lazy traversal of a folder tree.

use futures_util::Stream;
use futures_util::stream;
use tracing::debug;

use super::ArtifactoryArtifact;
use crate::error::ArtifactoryError;
use crate::models::artifact::ArtifactInfo;

/// Pending work of a walk. The top of the stack is processed next.
enum WalkStep {
    /// Fetch the info of a path.
    Visit(String),
    /// Emit a folder whose descendants have all been emitted.
    Yield(Box<ArtifactInfo>),
}

impl ArtifactoryArtifact {
    /// Walks the tree rooted at `path`, one info request per node.
    ///
    /// A file yields itself. A folder yields itself before its descendants
    /// when `topdown` is true and after them otherwise. Within a folder,
    /// subfolders are walked completely (in server order) before its files.
    /// The stream stops at the first error.
    pub fn walk(
        &self,
        path: &str,
        topdown: bool,
    ) -> impl Stream<Item = Result<ArtifactInfo, ArtifactoryError>> + '_ {
        let root = path.trim_end_matches('/').to_string();
        stream::try_unfold(vec![WalkStep::Visit(root)], move |mut stack| async move {
            while let Some(step) = stack.pop() {
                let path = match step {
                    WalkStep::Yield(info) => return Ok(Some((*info, stack))),
                    WalkStep::Visit(path) => path,
                };
                let info = self.info(&path).await?;
                let ArtifactInfo::Folder(folder) = &info else {
                    return Ok(Some((info, stack)));
                };

                let (folders, files): (Vec<_>, Vec<_>) =
                    folder.children.iter().partition(|child| child.folder);
                let children: Vec<String> = folders
                    .into_iter()
                    .chain(files)
                    .map(|child| format!("{path}{}", child.uri))
                    .collect();
                debug!(path = %path, children = children.len(), "walking folder");

                if topdown {
                    stack.extend(children.into_iter().rev().map(WalkStep::Visit));
                    return Ok(Some((info, stack)));
                }
                stack.push(WalkStep::Yield(Box::new(info)));
                stack.extend(children.into_iter().rev().map(WalkStep::Visit));
            }
            Ok::<_, ArtifactoryError>(None)
        })
    }
}
